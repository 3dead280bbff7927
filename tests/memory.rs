use anyhow::Result;
use pretty_assertions::assert_eq;
use strace::memory::{read_bytes, read_string, read_string_vector, read_value};
use strace::Error;

#[macro_use]
mod support;
use support::*;

#[test]
fn test_read_value() -> Result<()> {
    let mut task = FakeTask::new();
    let addr = task.push_value(&0x1122_3344_5566_7788u64);

    assert_eq!(read_value::<u64>(&task, addr)?, 0x1122_3344_5566_7788);
    assert_eq!(read_value::<u32>(&task, addr + 4)?, 0x1122_3344);

    Ok(())
}

#[test]
fn test_read_value_short() {
    let mut task = FakeTask::new();
    let addr = task.push(&[1, 2, 3]);

    let res = read_value::<u64>(&task, addr);

    assert!(matches!(res, Err(Error::ShortRead { wanted: 8, got: 3, .. })));
}

#[test]
fn test_read_bytes_truncates() -> Result<()> {
    let mut task = FakeTask::new();
    let addr = task.push(b"abcdef");

    assert_eq!(read_bytes(&task, addr, 4)?, b"abcd");
    assert_eq!(read_bytes(&task, addr + 2, 100)?, b"cdef");

    Ok(())
}

#[test]
fn test_read_string() -> Result<()> {
    let mut task = FakeTask::new();
    let addr = task.push_str("a string that spans several words");

    assert_eq!(read_string(&task, addr, 4096)?, "a string that spans several words");
    assert_eq!(read_string(&task, addr, 8)?, "a string");

    // Unaligned starts never read across the terminator into unmapped memory.
    assert_eq!(read_string(&task, addr + 30, 4096)?, "rds");

    Ok(())
}

#[test]
fn test_read_string_null() -> Result<()> {
    let task = FakeTask::new();

    assert_eq!(read_string(&task, 0, 4096)?, "<nil>");

    Ok(())
}

#[test]
fn test_read_string_unmapped() {
    let task = FakeTask::new();

    let res = read_string(&task, 0xdead_0000, 4096);

    assert!(matches!(res, Err(Error::Memory { addr: 0xdead_0000, .. })));
}

#[test]
fn test_read_string_vector() -> Result<()> {
    let mut task = FakeTask::new();
    let first = task.push_str("sh");
    let second = task.push_str("-c");
    let third = task.push_str("true");
    let argv = task.push_value(&[first, second, third, 0u64]);

    assert_eq!(read_string_vector(&task, argv, 4096, 4096)?, vec!["sh", "-c", "true"]);
    assert_eq!(read_string_vector(&task, argv, 1, 2)?, vec!["s", "-"]);
    assert_eq!(read_string_vector(&task, 0, 4096, 4096)?, Vec::<String>::new());

    Ok(())
}
