/// 虚拟地址空间子系统测试
/// 全部跑在内存设备（RamDrumArray）上，不触碰真实文件。
use super::*;
use crate::device::ram_device::RamDrumArray;
use crate::device::types::{BLOCK_SIZE, DRUM_SIZE, TOTAL_SIZE};
use crate::device::DeviceError;

/// 单个磁鼓的字节容量
const DRUM_BYTES: u32 = DRUM_SIZE as u32;

fn mounted_space() -> VirtualSpace<RamDrumArray> {
    let mut vs = VirtualSpace::new(RamDrumArray::new());
    vs.mount().unwrap();
    vs
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn round_trip_within_one_block() {
    let mut vs = mounted_space();
    let data = pattern(32);

    vs.write(100, &data).unwrap();

    let mut out = vec![0u8; 32];
    vs.read(100, &mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn round_trip_across_blocks() {
    let mut vs = mounted_space();
    // 从块 0 的中间一直写到块 3
    let data = pattern(3 * BLOCK_SIZE);
    vs.write(200, &data).unwrap();

    let mut out = vec![0u8; data.len()];
    vs.read(200, &mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn round_trip_across_drums() {
    let mut vs = mounted_space();
    // 从磁鼓 0 的末尾跨进磁鼓 1 的 0 号块
    let addr = DRUM_BYTES - 4;
    let data = pattern(10);
    vs.write(addr, &data).unwrap();

    let mut out = vec![0u8; 10];
    vs.read(addr, &mut out).unwrap();
    assert_eq!(out, data);

    // 核对底层数据确实落在两个磁鼓上
    let raw = vs.device().read_raw(addr as usize, 10);
    assert_eq!(raw, &data[..]);
    assert_eq!(vs.device().read_raw(DRUM_BYTES as usize, 6), &data[4..]);
}

#[test]
fn long_span_covering_a_whole_drum() {
    let mut vs = mounted_space();
    // 跨三个磁鼓的长写入：磁鼓 0 的尾部 + 整个磁鼓 1 + 磁鼓 2 的开头
    let addr = DRUM_BYTES - 150;
    let data = pattern(DRUM_SIZE as usize + 300);
    vs.write(addr, &data).unwrap();

    let mut out = vec![0u8; data.len()];
    vs.read(addr, &mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn partial_write_preserves_neighbors() {
    let mut vs = mounted_space();
    // 先给整个块铺上已知内容
    let base = vec![0xAAu8; BLOCK_SIZE];
    vs.write(0, &base).unwrap();

    // 只改块内最后一个字节
    vs.write(BLOCK_SIZE as u32 - 1, &[0x55]).unwrap();

    let mut out = vec![0u8; BLOCK_SIZE];
    vs.read(0, &mut out).unwrap();
    assert!(out[..BLOCK_SIZE - 1].iter().all(|&b| b == 0xAA));
    assert_eq!(out[BLOCK_SIZE - 1], 0x55);
}

#[test]
fn capacity_rejection_touches_no_device() {
    let mut vs = mounted_space();
    let addr = TOTAL_SIZE as u32 - 10;
    let before = vs.device().ops();

    // 剩余 10 字节，请求 11 字节
    let data = pattern(11);
    let err = vs.write(addr, &data).unwrap_err();
    assert!(matches!(
        err,
        VspaceError::CapacityExceeded { available: 10, .. }
    ));

    let mut out = vec![0u8; 11];
    let err = vs.read(addr, &mut out).unwrap_err();
    assert!(matches!(err, VspaceError::CapacityExceeded { .. }));

    // 拒绝发生在任何设备指令之前
    assert_eq!(vs.device().ops(), before);
}

#[test]
fn exact_remaining_capacity_is_accepted() {
    let mut vs = mounted_space();
    let addr = TOTAL_SIZE as u32 - 10;
    let data = pattern(10);
    vs.write(addr, &data).unwrap();

    let mut out = vec![0u8; 10];
    vs.read(addr, &mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn invalid_address_touches_no_device() {
    let mut vs = mounted_space();
    let before = vs.device().ops();

    let err = vs.read(TOTAL_SIZE as u32, &mut [0u8; 1]).unwrap_err();
    assert!(matches!(err, VspaceError::InvalidAddress(_)));
    assert_eq!(vs.device().ops(), before);
}

#[test]
fn zero_length_transfer_is_a_noop() {
    let mut vs = mounted_space();
    let before = vs.device().ops();

    vs.read(0, &mut []).unwrap();
    vs.write(0, &[]).unwrap();
    assert_eq!(vs.device().ops(), before);
}

#[test]
fn two_partial_blocks_cycle_counts() {
    let mut vs = mounted_space();
    let before = vs.device().ops();

    // 从块 0 的倒数第 10 个字节写 100 字节：块 0 和块 1 都是部分覆盖，
    // 每个块都要走一轮 seek + 预读 + seek + 写回
    vs.write(BLOCK_SIZE as u32 - 10, &pattern(100)).unwrap();

    let after = vs.device().ops();
    assert_eq!(after.drum_seeks - before.drum_seeks, 1);
    assert_eq!(after.block_seeks - before.block_seeks, 4);
    assert_eq!(after.block_reads - before.block_reads, 2);
    assert_eq!(after.block_writes - before.block_writes, 2);
}

#[test]
fn full_block_write_skips_the_preread() {
    let mut vs = mounted_space();
    let before = vs.device().ops();

    // 从块 0 的倒数第 10 个字节写 300 字节：
    // 块 0 部分覆盖（10 字节）、块 1 整块覆盖、块 2 部分覆盖（34 字节）。
    // 整块覆盖的中间块不需要预读，只有一次 seek + 写回。
    vs.write(BLOCK_SIZE as u32 - 10, &pattern(300)).unwrap();

    let after = vs.device().ops();
    assert_eq!(after.drum_seeks - before.drum_seeks, 1);
    assert_eq!(after.block_seeks - before.block_seeks, 5);
    assert_eq!(after.block_reads - before.block_reads, 2);
    assert_eq!(after.block_writes - before.block_writes, 3);

    // 三个块的内容都要正确
    let mut out = vec![0u8; 300];
    vs.read(BLOCK_SIZE as u32 - 10, &mut out).unwrap();
    assert_eq!(out, pattern(300));
}

#[test]
fn repeated_reads_are_identical() {
    let mut vs = mounted_space();
    let data = pattern(500);
    vs.write(1000, &data).unwrap();

    let mut first = vec![0u8; 500];
    let mut second = vec![0u8; 500];
    vs.read(1000, &mut first).unwrap();
    vs.read(1000, &mut second).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, data);
}

#[test]
fn unmounted_device_rejects_io() {
    let mut vs = VirtualSpace::new(RamDrumArray::new());

    let err = vs.read(0, &mut [0u8; 4]).unwrap_err();
    assert!(matches!(
        err,
        VspaceError::Device(DeviceError::NotMounted)
    ));

    let err = vs.write(0, &[1, 2, 3]).unwrap_err();
    assert!(matches!(
        err,
        VspaceError::Device(DeviceError::NotMounted)
    ));
}

#[test]
fn mount_unmount_round_trip() {
    let mut vs = VirtualSpace::new(RamDrumArray::new());
    vs.mount().unwrap();

    // 重复挂载是错误
    assert!(matches!(
        vs.mount().unwrap_err(),
        VspaceError::Device(DeviceError::AlreadyMounted)
    ));

    vs.unmount().unwrap();
    assert!(matches!(
        vs.unmount().unwrap_err(),
        VspaceError::Device(DeviceError::NotMounted)
    ));
}

#[test]
fn format_drum_clears_only_that_drum() {
    let mut vs = mounted_space();

    // 磁鼓 0 和磁鼓 1 各写一段数据
    vs.write(0, &pattern(64)).unwrap();
    vs.write(DRUM_BYTES, &pattern(64)).unwrap();

    vs.format_drum(0).unwrap();

    let mut out = vec![0u8; 64];
    vs.read(0, &mut out).unwrap();
    assert!(out.iter().all(|&b| b == 0));

    vs.read(DRUM_BYTES, &mut out).unwrap();
    assert_eq!(out, pattern(64));
}

#[test]
fn first_block_offset_only_applies_once() {
    let mut vs = mounted_space();
    // 起始偏移不为 0 的跨块读：第二个块必须从块首开始取
    let data = pattern(2 * BLOCK_SIZE);
    vs.write(BLOCK_SIZE as u32 / 2, &data).unwrap();

    let raw = vs.device().read_raw(BLOCK_SIZE / 2, 2 * BLOCK_SIZE);
    assert_eq!(raw, &data[..]);

    // 写入区间之外的第一个字节不能被碰到
    assert_eq!(vs.device().read_raw(BLOCK_SIZE / 2 + 2 * BLOCK_SIZE, 1)[0], 0);
    assert_eq!(vs.device().read_raw(BLOCK_SIZE / 2 - 1, 1)[0], 0);
}
