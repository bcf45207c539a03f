/// 每个物理块（Block）的大小：256 字节
/// 磁鼓设备以“块”为最小读写单位。
pub const BLOCK_SIZE: usize = 256;

/// 每个磁鼓包含的块数
/// 块号的合法范围是 [0, BLOCKS_PER_DRUM)。
pub const BLOCKS_PER_DRUM: usize = 256;

/// 阵列中磁鼓的数量
/// 指令字段里磁鼓号只有 4 位，所以最多 16 个。
pub const DRUM_COUNT: usize = 16;

/// 单个磁鼓的容量（单位：字节）
pub const DRUM_SIZE: u64 = (BLOCKS_PER_DRUM * BLOCK_SIZE) as u64;

/// 整个虚拟地址空间的大小（单位：字节）
/// 16 * 256 * 256 = 1MB
pub const TOTAL_SIZE: u64 = DRUM_COUNT as u64 * DRUM_SIZE;

/// 定义一个物理块类型（每块 256 字节的数组）
/// 所有设备读写都以 Block 为单位进行。
pub type Block = [u8; BLOCK_SIZE];
