use crate::device::{
    instruction::{Instruction, Opcode},
    types::{Block, BLOCKS_PER_DRUM, BLOCK_SIZE},
    DrumDevice,
};
use crate::vspace::{
    address::{in_range, translate, Position},
    capacity::remaining_capacity,
    error::{Result, VspaceError},
};

pub mod address;
pub mod capacity;
pub mod error;

#[cfg(test)]
mod tests;

/// 建立在磁鼓阵列之上的平面虚拟地址空间
///
/// 设备只认 (磁鼓, 块) 坐标和整块读写；这一层把平面字节地址
/// 翻译成设备坐标，并驱动跨块、跨磁鼓的读写。
/// 设备不提供“游标在哪”的查询，读写又会把游标偷偷推进，
/// 所以这里自己维护坐标，每次访问前都显式 seek。
#[derive(Debug)]
pub struct VirtualSpace<D: DrumDevice> {
    device: D,
}

impl<D: DrumDevice> VirtualSpace<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// 挂载虚拟地址空间
    pub fn mount(&mut self) -> Result<()> {
        self.device
            .execute(Instruction::opcode_only(Opcode::Mount), None)?;
        Ok(())
    }

    /// 卸载虚拟地址空间
    pub fn unmount(&mut self) -> Result<()> {
        self.device
            .execute(Instruction::opcode_only(Opcode::Unmount), None)?;
        Ok(())
    }

    /// 将指定磁鼓整体清零
    pub fn format_drum(&mut self, drum: u32) -> Result<()> {
        self.device
            .execute(Instruction::encode(Opcode::FormatDrum, drum, 0), None)?;
        Ok(())
    }

    /// 从虚拟地址 addr 开始读出 buf.len() 个字节
    pub fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let pos = self.check_span(addr, buf.len())?;

        let mut drum = pos.drum;
        let mut block = pos.block;
        let mut offset = pos.offset as usize;

        // 先定位到起始磁鼓
        self.device
            .execute(Instruction::encode(Opcode::SeekDrum, drum, 0), None)?;

        let mut scratch: Block = [0; BLOCK_SIZE];
        let mut copied = 0usize;

        while copied < buf.len() {
            // 上一次读写已经推进了设备游标，访问前必须重新定位
            self.device
                .execute(Instruction::encode(Opcode::SeekBlock, drum, block), None)?;
            self.device.execute(
                Instruction::encode(Opcode::ReadBlock, drum, block),
                Some(&mut scratch),
            )?;

            let take = (buf.len() - copied).min(BLOCK_SIZE - offset);
            buf[copied..copied + take].copy_from_slice(&scratch[offset..offset + take]);
            copied += take;
            offset = 0; // 第一个块之后都从块首开始

            if copied < buf.len() {
                if block as usize == BLOCKS_PER_DRUM - 1 {
                    // 跨磁鼓边界：下一个磁鼓的 0 号块
                    drum += 1;
                    block = 0;
                    self.device
                        .execute(Instruction::encode(Opcode::SeekDrum, drum, 0), None)?;
                } else {
                    block += 1;
                }
            }
        }

        Ok(())
    }

    /// 把 data 写入从虚拟地址 addr 开始的区间
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let pos = self.check_span(addr, data.len())?;

        let mut drum = pos.drum;
        let mut block = pos.block;
        let mut offset = pos.offset as usize;

        self.device
            .execute(Instruction::encode(Opcode::SeekDrum, drum, 0), None)?;

        let mut scratch: Block = [0; BLOCK_SIZE];
        let mut written = 0usize;

        while written < data.len() {
            let take = (data.len() - written).min(BLOCK_SIZE - offset);

            if take == BLOCK_SIZE {
                // 整块覆盖，不需要预读
                scratch.copy_from_slice(&data[written..written + BLOCK_SIZE]);
            } else {
                // 部分覆盖：先读出原块，保住未触及的字节
                self.device
                    .execute(Instruction::encode(Opcode::SeekBlock, drum, block), None)?;
                self.device.execute(
                    Instruction::encode(Opcode::ReadBlock, drum, block),
                    Some(&mut scratch),
                )?;
                scratch[offset..offset + take].copy_from_slice(&data[written..written + take]);
            }

            // 写回前定位到目标块（预读会把设备游标推过去）
            self.device
                .execute(Instruction::encode(Opcode::SeekBlock, drum, block), None)?;
            self.device.execute(
                Instruction::encode(Opcode::WriteBlock, drum, block),
                Some(&mut scratch),
            )?;

            written += take;
            offset = 0;

            if written < data.len() {
                if block as usize == BLOCKS_PER_DRUM - 1 {
                    drum += 1;
                    block = 0;
                    self.device
                        .execute(Instruction::encode(Opcode::SeekDrum, drum, 0), None)?;
                } else {
                    block += 1;
                }
            }
        }

        Ok(())
    }

    /// 校验 (addr, len) 完全落在地址空间内，返回起始坐标
    /// 校验失败时不会下发任何设备指令。
    fn check_span(&self, addr: u32, len: usize) -> Result<Position> {
        if !in_range(addr) {
            return Err(VspaceError::InvalidAddress(addr));
        }
        let pos = translate(addr);
        let available = remaining_capacity(pos);
        if len as u64 > available as u64 {
            return Err(VspaceError::CapacityExceeded { addr, len, available });
        }
        Ok(pos)
    }

    /// 底层设备的只读访问（shell 展示设备信息用）
    pub fn device(&self) -> &D {
        &self.device
    }
}
