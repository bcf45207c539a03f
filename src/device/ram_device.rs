use crate::device::{
    drum_device::{DeviceError, DrumDevice},
    instruction::{Instruction, Opcode},
    types::{Block, BLOCKS_PER_DRUM, BLOCK_SIZE, DRUM_COUNT, DRUM_SIZE, TOTAL_SIZE},
};

/// 各类指令的执行次数统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpCounts {
    pub mounts: u64,
    pub unmounts: u64,
    pub drum_seeks: u64,
    pub block_seeks: u64,
    pub block_reads: u64,
    pub block_writes: u64,
    pub formats: u64,
}

/// 基于内存的磁鼓阵列模拟器，主要给测试用
/// 游标语义与文件版完全一致，另外统计每类指令被下发了多少次，
/// 便于断言“某次调用没有触碰设备”或核对 seek/读/写的节奏。
#[derive(Debug)]
pub struct RamDrumArray {
    data: Vec<u8>, // 所有磁鼓的数据平铺在一起
    mounted: bool,
    cursor_drum: u32,
    cursor_block: u32,
    ops: OpCounts,
}

impl RamDrumArray {
    pub fn new() -> Self {
        Self {
            data: vec![0u8; TOTAL_SIZE as usize],
            mounted: false,
            cursor_drum: 0,
            cursor_block: 0,
            ops: OpCounts::default(),
        }
    }

    /// 指令执行统计的当前快照
    pub fn ops(&self) -> OpCounts {
        self.ops
    }

    /// 直接读出底层字节，用于测试核对
    pub fn read_raw(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    fn ensure_mounted(&self) -> Result<(), DeviceError> {
        if !self.mounted {
            return Err(DeviceError::NotMounted);
        }
        Ok(())
    }

    fn data_offset(&self) -> usize {
        (self.cursor_drum as u64 * DRUM_SIZE) as usize + self.cursor_block as usize * BLOCK_SIZE
    }

    fn advance_cursor(&mut self) {
        self.cursor_block += 1;
        if self.cursor_block as usize == BLOCKS_PER_DRUM {
            self.cursor_block = 0;
            self.cursor_drum = (self.cursor_drum + 1) % DRUM_COUNT as u32;
        }
    }
}

impl DrumDevice for RamDrumArray {
    fn execute(&mut self, instr: Instruction, block: Option<&mut Block>) -> Result<(), DeviceError> {
        let opcode = instr
            .opcode()
            .ok_or(DeviceError::InvalidOpcode(instr.word()))?;

        match opcode {
            Opcode::Mount => {
                self.ops.mounts += 1;
                if self.mounted {
                    return Err(DeviceError::AlreadyMounted);
                }
                self.mounted = true;
                Ok(())
            }
            Opcode::Unmount => {
                self.ops.unmounts += 1;
                self.ensure_mounted()?;
                self.mounted = false;
                Ok(())
            }
            Opcode::SeekDrum => {
                self.ops.drum_seeks += 1;
                self.ensure_mounted()?;
                let drum = instr.drum();
                if drum as usize >= DRUM_COUNT {
                    return Err(DeviceError::DrumOutOfRange(drum));
                }
                self.cursor_drum = drum;
                self.cursor_block = 0;
                Ok(())
            }
            Opcode::SeekBlock => {
                self.ops.block_seeks += 1;
                self.ensure_mounted()?;
                let block_id = instr.block();
                if block_id as usize >= BLOCKS_PER_DRUM {
                    return Err(DeviceError::BlockOutOfRange(block_id));
                }
                self.cursor_block = block_id;
                Ok(())
            }
            Opcode::ReadBlock => {
                self.ops.block_reads += 1;
                self.ensure_mounted()?;
                let buf = block.ok_or(DeviceError::MissingBuffer)?;
                let start = self.data_offset();
                buf.copy_from_slice(&self.data[start..start + BLOCK_SIZE]);
                self.advance_cursor();
                Ok(())
            }
            Opcode::WriteBlock => {
                self.ops.block_writes += 1;
                self.ensure_mounted()?;
                let buf = block.ok_or(DeviceError::MissingBuffer)?;
                let start = self.data_offset();
                self.data[start..start + BLOCK_SIZE].copy_from_slice(&buf[..]);
                self.advance_cursor();
                Ok(())
            }
            Opcode::FormatDrum => {
                self.ops.formats += 1;
                self.ensure_mounted()?;
                let drum = instr.drum();
                if drum as usize >= DRUM_COUNT {
                    return Err(DeviceError::DrumOutOfRange(drum));
                }
                let start = (drum as u64 * DRUM_SIZE) as usize;
                self.data[start..start + DRUM_SIZE as usize].fill(0);
                Ok(())
            }
        }
    }
}
