use std::fmt;

use crate::device::DeviceError;

/// 虚拟地址空间错误类型
#[derive(Debug)]
pub enum VspaceError {
    Device(DeviceError), // 底层设备报告的失败
    CapacityExceeded {
        addr: u32,
        len: usize,
        available: u32,
    }, // 请求长度超出该位置的剩余容量
    InvalidAddress(u32), // 起始地址本身就在几何范围之外
}

impl From<DeviceError> for VspaceError {
    fn from(e: DeviceError) -> Self {
        VspaceError::Device(e)
    }
}

// 实现 Display trait，用于打印错误信息
impl fmt::Display for VspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(e) => write!(f, "Device error: {}", e),
            Self::CapacityExceeded { addr, len, available } => write!(
                f,
                "Transfer of {} bytes at address {:#x} exceeds remaining capacity ({} bytes left)",
                len, addr, available
            ),
            Self::InvalidAddress(addr) => {
                write!(f, "Address {:#x} is outside the drum array", addr)
            }
        }
    }
}

// 支持链式错误，方便追踪底层原因
impl std::error::Error for VspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Device(e) => Some(e),
            _ => None,
        }
    }
}

/// 虚拟地址空间统一结果类型
pub type Result<T> = std::result::Result<T, VspaceError>;
