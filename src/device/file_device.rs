use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
};

use bitflags::bitflags;

use crate::device::{
    drum_device::{DeviceError, DrumDevice},
    header::{DeviceHeader, HEADER_SIZE},
    instruction::{Instruction, Opcode},
    types::{Block, BLOCKS_PER_DRUM, BLOCK_SIZE, DRUM_COUNT, DRUM_SIZE, TOTAL_SIZE},
};

bitflags! {
    /// 设备的运行状态标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeviceStatus: u32 {
        const MOUNTED = 1 << 0; // 已挂载
        const DIRTY = 1 << 1;   // 挂载期间有写入
    }
}

/// 基于文件的磁鼓阵列模拟器
/// 备份文件的布局：头部区（HEADER_SIZE 字节）+ 所有磁鼓的原始数据。
/// 设备维护一个 (磁鼓, 块) 游标：seek 类指令显式设置它，
/// 读写指令在游标处操作并把游标推进到下一个块。
#[derive(Debug)]
pub struct FileDrumArray {
    file: File,
    header: DeviceHeader,
    status: DeviceStatus,
    cursor_drum: u32,
    cursor_block: u32,
}

impl FileDrumArray {
    /// 打开备份文件；不存在或不完整时创建新设备
    pub fn open(path: &str) -> Result<Self, DeviceError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let header = if file.metadata()?.len() < HEADER_SIZE + TOTAL_SIZE {
            // 新设备：预分配空间（磁鼓数据全零），写入新头部
            file.set_len(HEADER_SIZE + TOTAL_SIZE)?;
            let header = DeviceHeader::new("MiniDrum");
            Self::write_header(&mut file, &header)?;
            header
        } else {
            Self::read_header(&mut file)?
        };

        Ok(Self {
            file,
            header,
            status: DeviceStatus::empty(),
            cursor_drum: 0,
            cursor_block: 0,
        })
    }

    pub fn header(&self) -> &DeviceHeader {
        &self.header
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    fn read_header(file: &mut File) -> Result<DeviceHeader, DeviceError> {
        file.seek(SeekFrom::Start(0))?;
        let mut buf = vec![0u8; HEADER_SIZE as usize];
        file.read_exact(&mut buf)?;

        let header = DeviceHeader::from_bytes(&buf)?;
        if !header.matches_geometry() {
            return Err(DeviceError::GeometryMismatch);
        }
        Ok(header)
    }

    fn write_header(file: &mut File, header: &DeviceHeader) -> Result<(), DeviceError> {
        let buf = header.to_bytes()?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&buf)?;
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<(), DeviceError> {
        if !self.status.contains(DeviceStatus::MOUNTED) {
            return Err(DeviceError::NotMounted);
        }
        Ok(())
    }

    /// 游标当前指向的块在备份文件中的字节偏移
    fn data_offset(&self) -> u64 {
        HEADER_SIZE + self.cursor_drum as u64 * DRUM_SIZE + self.cursor_block as u64 * BLOCK_SIZE as u64
    }

    /// 读写之后游标自动推进到下一个块，到磁鼓末尾时绕到下一个磁鼓
    fn advance_cursor(&mut self) {
        self.cursor_block += 1;
        if self.cursor_block as usize == BLOCKS_PER_DRUM {
            self.cursor_block = 0;
            self.cursor_drum = (self.cursor_drum + 1) % DRUM_COUNT as u32;
        }
    }

    fn do_mount(&mut self) -> Result<(), DeviceError> {
        if self.status.contains(DeviceStatus::MOUNTED) {
            return Err(DeviceError::AlreadyMounted);
        }
        self.header.mount_count += 1;
        self.header.clean = false;
        Self::write_header(&mut self.file, &self.header)?;
        self.status.insert(DeviceStatus::MOUNTED);
        Ok(())
    }

    fn do_unmount(&mut self) -> Result<(), DeviceError> {
        self.ensure_mounted()?;
        self.header.clean = true;
        Self::write_header(&mut self.file, &self.header)?;
        self.file.sync_all()?;
        self.status = DeviceStatus::empty();
        Ok(())
    }

    fn seek_drum(&mut self, drum: u32) -> Result<(), DeviceError> {
        self.ensure_mounted()?;
        if drum as usize >= DRUM_COUNT {
            return Err(DeviceError::DrumOutOfRange(drum));
        }
        self.cursor_drum = drum;
        self.cursor_block = 0;
        Ok(())
    }

    fn seek_block(&mut self, block: u32) -> Result<(), DeviceError> {
        self.ensure_mounted()?;
        if block as usize >= BLOCKS_PER_DRUM {
            return Err(DeviceError::BlockOutOfRange(block));
        }
        self.cursor_block = block;
        Ok(())
    }

    fn read_block(&mut self, buf: &mut Block) -> Result<(), DeviceError> {
        self.ensure_mounted()?;
        self.file.seek(SeekFrom::Start(self.data_offset()))?;
        self.file.read_exact(buf)?;
        self.advance_cursor();
        Ok(())
    }

    fn write_block(&mut self, buf: &Block) -> Result<(), DeviceError> {
        self.ensure_mounted()?;
        self.file.seek(SeekFrom::Start(self.data_offset()))?;
        self.file.write_all(buf)?;
        self.status.insert(DeviceStatus::DIRTY);
        self.advance_cursor();
        Ok(())
    }

    fn format_drum(&mut self, drum: u32) -> Result<(), DeviceError> {
        self.ensure_mounted()?;
        if drum as usize >= DRUM_COUNT {
            return Err(DeviceError::DrumOutOfRange(drum));
        }

        self.file
            .seek(SeekFrom::Start(HEADER_SIZE + drum as u64 * DRUM_SIZE))?;
        let zeroes: Block = [0; BLOCK_SIZE];
        for _ in 0..BLOCKS_PER_DRUM {
            self.file.write_all(&zeroes)?;
        }
        self.status.insert(DeviceStatus::DIRTY);
        Ok(())
    }
}

impl DrumDevice for FileDrumArray {
    fn execute(&mut self, instr: Instruction, block: Option<&mut Block>) -> Result<(), DeviceError> {
        let opcode = instr
            .opcode()
            .ok_or(DeviceError::InvalidOpcode(instr.word()))?;

        match opcode {
            Opcode::Mount => self.do_mount(),
            Opcode::Unmount => self.do_unmount(),
            Opcode::SeekDrum => self.seek_drum(instr.drum()),
            Opcode::SeekBlock => self.seek_block(instr.block()),
            Opcode::ReadBlock => self.read_block(block.ok_or(DeviceError::MissingBuffer)?),
            Opcode::WriteBlock => self.write_block(block.ok_or(DeviceError::MissingBuffer)?),
            Opcode::FormatDrum => self.format_drum(instr.drum()),
        }
    }
}
