use std::fmt;

use crate::device::instruction::Instruction;
use crate::device::types::Block;

/// 磁鼓阵列设备的统一入口
/// 所有操作都通过一条打包指令下发：
/// 读类指令向 block 缓冲区写入一个块的数据，
/// 写类指令从 block 缓冲区取走一个块的数据，
/// seek / mount / unmount / format 类指令不使用缓冲区（传 None）。
pub trait DrumDevice {
    fn execute(&mut self, instr: Instruction, block: Option<&mut Block>) -> Result<(), DeviceError>;
}

/// 设备层错误类型
#[derive(Debug)]
pub enum DeviceError {
    Io(std::io::Error),      // 底层 I/O 错误
    NotMounted,              // 设备尚未挂载
    AlreadyMounted,          // 设备已经挂载
    InvalidOpcode(u32),      // 指令字中的操作码无法识别
    DrumOutOfRange(u32),     // 磁鼓号超出阵列范围
    BlockOutOfRange(u32),    // 块号超出磁鼓范围
    MissingBuffer,           // 读写指令缺少块缓冲区
    BadHeader(String),       // 备份文件头损坏或无法解析
    GeometryMismatch,        // 备份文件的几何参数与本设备不一致
}

impl From<std::io::Error> for DeviceError {
    fn from(e: std::io::Error) -> Self {
        DeviceError::Io(e)
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Device I/O error: {}", e),
            Self::NotMounted => write!(f, "Drum array is not mounted"),
            Self::AlreadyMounted => write!(f, "Drum array is already mounted"),
            Self::InvalidOpcode(word) => write!(f, "Unrecognized opcode in instruction {:#010x}", word),
            Self::DrumOutOfRange(drum) => write!(f, "Drum {} is outside the array", drum),
            Self::BlockOutOfRange(block) => write!(f, "Block {} is outside the drum", block),
            Self::MissingBuffer => write!(f, "Block transfer instruction is missing its buffer"),
            Self::BadHeader(desc) => write!(f, "Device image header is corrupted: {}", desc),
            Self::GeometryMismatch => write!(f, "Device image geometry does not match this device"),
        }
    }
}

// 支持链式错误，方便追踪底层原因
impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
