use serde::{Deserialize, Serialize};

use crate::device::drum_device::DeviceError;
use crate::device::types::{BLOCKS_PER_DRUM, BLOCK_SIZE, DRUM_COUNT};
use crate::utils::{current_timestamp, generate_uuid};

/// 头部区在备份文件中占用的字节数（位于所有磁鼓数据之前）
pub const HEADER_SIZE: u64 = 512;

/// 魔数，用于识别备份文件
pub const MAGIC: u64 = 0xD2C4_B10C;

/// 备份文件的头部信息
/// 重新打开文件时用它校验几何参数是否一致。
#[derive(Debug, Serialize, Deserialize)]
pub struct DeviceHeader {
    pub label: String, // 设备标识
    pub volume_id: String, // 卷 ID，创建时随机生成
    /** 几何信息 */
    pub block_size: u64, // 每块大小（字节）
    pub blocks_per_drum: u64, // 每个磁鼓的块数
    pub drum_count: u64, // 磁鼓数量
    /** 状态信息 */
    pub created_at: u64, // 创建时间戳
    pub mount_count: u64, // 累计挂载次数
    pub clean: bool,     // 上次是否正常卸载
    /** 其他元信息 */
    pub magic: u64,
}

impl DeviceHeader {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            volume_id: generate_uuid(),
            block_size: BLOCK_SIZE as u64,
            blocks_per_drum: BLOCKS_PER_DRUM as u64,
            drum_count: DRUM_COUNT as u64,
            created_at: current_timestamp(),
            mount_count: 0,
            clean: true,
            magic: MAGIC,
        }
    }

    /// 头部的几何参数是否与编译期常量一致
    pub fn matches_geometry(&self) -> bool {
        self.block_size == BLOCK_SIZE as u64
            && self.blocks_per_drum == BLOCKS_PER_DRUM as u64
            && self.drum_count == DRUM_COUNT as u64
    }

    /// 序列化成定长的头部区：前 8 字节是长度前缀，后面是 bincode 数据
    pub fn to_bytes(&self) -> Result<Vec<u8>, DeviceError> {
        let bytes =
            bincode::serialize(self).map_err(|e| DeviceError::BadHeader(e.to_string()))?;

        if bytes.len() + 8 > HEADER_SIZE as usize {
            return Err(DeviceError::BadHeader(
                "serialized header does not fit the header region".to_string(),
            ));
        }

        let mut buf = vec![0u8; HEADER_SIZE as usize];
        let len_bytes = (bytes.len() as u64).to_le_bytes();
        buf[..8].copy_from_slice(&len_bytes);
        buf[8..8 + bytes.len()].copy_from_slice(&bytes);
        Ok(buf)
    }

    /// 从头部区还原，校验长度前缀和魔数
    pub fn from_bytes(buf: &[u8]) -> Result<Self, DeviceError> {
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&buf[..8]);
        let serialized_len = u64::from_le_bytes(len_bytes) as usize;

        if serialized_len + 8 > buf.len() {
            return Err(DeviceError::BadHeader(
                "header length prefix is out of bounds".to_string(),
            ));
        }

        let header: DeviceHeader = bincode::deserialize(&buf[8..8 + serialized_len])
            .map_err(|e| DeviceError::BadHeader(e.to_string()))?;

        if header.magic != MAGIC {
            return Err(DeviceError::BadHeader(format!(
                "bad magic {:#x}",
                header.magic
            )));
        }

        Ok(header)
    }
}
