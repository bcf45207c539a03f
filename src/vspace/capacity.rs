use crate::device::types::{BLOCKS_PER_DRUM, BLOCK_SIZE, DRUM_COUNT};
use crate::vspace::address::Position;

/// 从给定坐标到地址空间末尾还剩多少字节：
/// 当前块的尾部 + 当前磁鼓剩余的整块 + 后面所有磁鼓
pub fn remaining_capacity(pos: Position) -> u32 {
    let in_block = BLOCK_SIZE as u32 - pos.offset;
    let in_drum = (BLOCKS_PER_DRUM as u32 - (pos.block + 1)) * BLOCK_SIZE as u32;
    let in_array =
        (DRUM_COUNT as u32 - (pos.drum + 1)) * (BLOCKS_PER_DRUM * BLOCK_SIZE) as u32;
    in_block + in_drum + in_array
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::types::TOTAL_SIZE;
    use crate::vspace::address::translate;

    #[test]
    fn full_capacity_at_origin() {
        assert_eq!(remaining_capacity(translate(0)) as u64, TOTAL_SIZE);
    }

    #[test]
    fn one_byte_at_the_end() {
        assert_eq!(remaining_capacity(translate(TOTAL_SIZE as u32 - 1)), 1);
    }

    #[test]
    fn tail_of_first_block() {
        // 块内偏移 10：当前块剩 246 字节，其余空间完整
        let pos = translate(10);
        assert_eq!(
            remaining_capacity(pos) as u64,
            TOTAL_SIZE - 10
        );
    }

    #[test]
    fn last_block_of_a_drum() {
        // 磁鼓 0 的最后一个块开头：剩这一个块加上后面 15 个磁鼓
        let addr = ((BLOCKS_PER_DRUM - 1) * BLOCK_SIZE) as u32;
        let expected = BLOCK_SIZE as u64 + (DRUM_COUNT as u64 - 1) * (BLOCKS_PER_DRUM * BLOCK_SIZE) as u64;
        assert_eq!(remaining_capacity(translate(addr)) as u64, expected);
    }
}
