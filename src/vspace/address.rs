use crate::device::types::{BLOCKS_PER_DRUM, BLOCK_SIZE, TOTAL_SIZE};

/// 单个磁鼓的字节容量
const DRUM_BYTES: u32 = (BLOCKS_PER_DRUM * BLOCK_SIZE) as u32;

/// 一个虚拟地址翻译出的设备坐标
/// 不变式：drum * DRUM_BYTES + block * BLOCK_SIZE + offset == addr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub drum: u32,   // 磁鼓号
    pub block: u32,  // 磁鼓内的块号
    pub offset: u32, // 块内的字节偏移
}

/// 地址所在的磁鼓号
pub fn drum_of(addr: u32) -> u32 {
    addr / DRUM_BYTES
}

/// 地址所在磁鼓内的块号
pub fn block_of(addr: u32) -> u32 {
    (addr % DRUM_BYTES) / BLOCK_SIZE as u32
}

/// 地址在块内的字节偏移
pub fn offset_of(addr: u32) -> u32 {
    addr % BLOCK_SIZE as u32
}

/// 把平面虚拟地址翻译成 (磁鼓, 块, 偏移) 三元组
/// 这里不做越界检查，调用方负责先确认地址在几何范围内。
pub fn translate(addr: u32) -> Position {
    Position {
        drum: drum_of(addr),
        block: block_of(addr),
        offset: offset_of(addr),
    }
}

/// 地址是否落在几何范围内
pub fn in_range(addr: u32) -> bool {
    (addr as u64) < TOTAL_SIZE
}
