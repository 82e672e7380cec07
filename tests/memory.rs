use byte_streams::{Error, IoStreamer, MemoryStream, SeekOrigin, Stream};
use std::io::{Read, Seek, SeekFrom, Write};

fn stream_with(bytes: &[u8]) -> MemoryStream {
    MemoryStream::from(bytes.to_vec())
}

#[test]
fn test_capabilities() {
    let stream = MemoryStream::new();
    assert!(stream.can_read());
    assert!(stream.can_write());
    assert!(stream.can_seek());
    assert!(!stream.can_timeout());
}

#[test]
fn test_round_trip() -> anyhow::Result<()> {
    let message = b"Greetings, world!";
    let mut stream = MemoryStream::new();
    assert_eq!(stream.write(message)?, message.len());
    assert_eq!(stream.position()?, message.len() as i64);

    stream.seek(0, SeekOrigin::Beginning)?;
    assert_eq!(stream.read(message.len())?, message);
    assert_eq!(stream.into_inner(), message);
    Ok(())
}

#[test]
fn test_read_all_without_seek() -> anyhow::Result<()> {
    let mut stream = stream_with(b"0123456789");
    assert_eq!(stream.read_all()?, b"0123456789");
    assert_eq!(stream.position()?, 10);

    assert!(MemoryStream::new().read_all()?.is_empty());
    Ok(())
}

#[test]
fn test_read_empty_fails() {
    let mut stream = MemoryStream::new();
    assert!(matches!(stream.read(1), Err(Error::ReadFailed(0))));
}

#[test]
fn test_read_clamps_to_available() -> anyhow::Result<()> {
    let mut stream = stream_with(b"abcdef");
    stream.seek(4, SeekOrigin::Beginning)?;
    assert_eq!(stream.read(100)?, b"ef");
    assert!(matches!(stream.read(1), Err(Error::ReadFailed(0))));
    Ok(())
}

#[test]
fn test_overwrite_in_place() -> anyhow::Result<()> {
    let mut stream = stream_with(b"hello, world");
    stream.seek(7, SeekOrigin::Beginning)?;
    stream.write(b"there")?;
    assert_eq!(stream.get_ref(), b"hello, there");

    // Writing across the end grows the buffer.
    stream.seek(-1, SeekOrigin::Current)?;
    stream.write(b"e!!")?;
    assert_eq!(stream.get_ref(), b"hello, there!!");
    Ok(())
}

// Test that writing past the end of the buffer zero-fills the gap.
#[test]
fn test_write_past_end() -> anyhow::Result<()> {
    let mut stream = stream_with(b"0123456789");
    stream.seek(8, SeekOrigin::Beginning)?;
    stream.get_mut().truncate(4);
    stream.write(b"hi")?;

    stream.seek(0, SeekOrigin::Beginning)?;
    assert_eq!(stream.read_exact(10)?, b"0123\0\0\0\0hi");
    Ok(())
}

#[test]
fn test_seek_bounds() -> anyhow::Result<()> {
    let mut stream = stream_with(b"hello");
    stream.seek(2, SeekOrigin::Beginning)?;

    assert!(matches!(
        stream.seek(5, SeekOrigin::Beginning),
        Err(Error::SeekFailed(0))
    ));
    assert!(matches!(
        stream.seek(-3, SeekOrigin::Current),
        Err(Error::SeekFailed(0))
    ));
    assert_eq!(stream.position()?, 2);

    stream.seek(2, SeekOrigin::Current)?;
    assert_eq!(stream.position()?, 4);

    // Nothing can be sought in an empty buffer.
    let mut empty = MemoryStream::new();
    assert!(matches!(
        empty.seek(0, SeekOrigin::Beginning),
        Err(Error::SeekFailed(0))
    ));
    Ok(())
}

// `End` is measured from the last byte, not one past it.
#[test]
fn test_seek_from_end_is_last_byte() -> anyhow::Result<()> {
    let mut stream = stream_with(b"hello");
    stream.seek(0, SeekOrigin::End)?;
    assert_eq!(stream.position()?, 4);
    assert_eq!(stream.read(10)?, b"o");

    stream.seek(-4, SeekOrigin::End)?;
    assert_eq!(stream.position()?, 0);
    assert!(matches!(
        stream.seek(1, SeekOrigin::End),
        Err(Error::SeekFailed(0))
    ));
    assert!(matches!(
        stream.seek(-5, SeekOrigin::End),
        Err(Error::SeekFailed(0))
    ));
    Ok(())
}

#[test]
fn test_typed_values() -> anyhow::Result<()> {
    let mut stream = MemoryStream::new();
    stream.write_value(&0xdead_beef_u32)?;
    stream.write_value(&-1.5_f64)?;
    stream.write_i8(-3)?;
    stream.write_u8(0xfe)?;
    stream.write_value(&[1_u16, 2, 3])?;
    assert_eq!(stream.len(), 4 + 8 + 1 + 1 + 6);
    assert_eq!(&stream.get_ref()[..4], &0xdead_beef_u32.to_ne_bytes());

    stream.seek(0, SeekOrigin::Beginning)?;
    assert_eq!(stream.read_value::<u32>()?, 0xdead_beef);
    assert_eq!(stream.read_value::<f64>()?.to_bits(), (-1.5_f64).to_bits());
    assert_eq!(stream.read_i8()?, -3);
    assert_eq!(stream.read_u8()?, 0xfe);
    assert_eq!(stream.read_value::<[u16; 3]>()?, [1, 2, 3]);
    assert!(matches!(stream.read_value::<u8>(), Err(Error::ReadFailed(0))));
    Ok(())
}

#[test]
fn test_zero_sized_values() -> anyhow::Result<()> {
    let value: [[u32; 0]; 2] = [[], []];
    let mut stream = MemoryStream::new();
    stream.write_value(&value)?;
    assert!(stream.is_empty());
    assert_eq!(stream.read_value::<[[u32; 0]; 2]>()?, value);
    Ok(())
}

#[test]
fn test_read_value_short_buffer() -> anyhow::Result<()> {
    let mut stream = stream_with(&[1, 2, 3]);
    assert!(matches!(stream.read_value::<u32>(), Err(Error::ReadFailed(0))));
    Ok(())
}

#[test]
fn test_cstrings() -> anyhow::Result<()> {
    let mut stream = MemoryStream::new();
    stream.write_str("hello")?;
    stream.write_u8(0)?;
    stream.write_str("wörld")?;
    stream.write_u8(0)?;

    stream.seek(0, SeekOrigin::Beginning)?;
    assert_eq!(stream.read_cstring()?, "hello");
    assert_eq!(stream.read_cstring()?, "wörld");
    Ok(())
}

// `write_str` doesn't append a terminator, so reading it back as a
// NUL-terminated string runs off the end.
#[test]
fn test_write_str_is_not_terminated() -> anyhow::Result<()> {
    let mut stream = MemoryStream::new();
    stream.write_str("abc")?;
    assert_eq!(stream.get_ref(), b"abc");

    stream.seek(0, SeekOrigin::Beginning)?;
    assert!(matches!(stream.read_cstring(), Err(Error::ReadFailed(0))));
    Ok(())
}

#[test]
fn test_cstring_invalid_utf8() -> anyhow::Result<()> {
    let mut stream = stream_with(&[0xff, 0xfe, 0]);
    assert!(matches!(stream.read_cstring(), Err(Error::InvalidUtf8(_))));
    Ok(())
}

#[test]
fn test_read_until() -> anyhow::Result<()> {
    let mut stream = stream_with(b"first line\nsecond\n\nlast");
    assert_eq!(stream.read_until(b'\n')?, b"first line");
    assert_eq!(stream.read_until(b'\n')?, b"second");
    assert_eq!(stream.read_until(b'\n')?, b"");
    assert_eq!(stream.position()?, 19);
    assert!(matches!(stream.read_until(b'\n'), Err(Error::ReadFailed(0))));
    // The delimiter stays in the buffer.
    assert_eq!(stream.get_ref()[10], b'\n');
    Ok(())
}

#[test]
fn test_close_is_a_no_op() -> anyhow::Result<()> {
    let mut stream = stream_with(b"abc");
    stream.close()?;
    stream.close()?;
    assert_eq!(stream.read_all()?, b"abc");
    Ok(())
}

#[test]
fn test_timeouts_are_stored() {
    let mut stream = MemoryStream::new();
    stream.set_read_timeout(10);
    stream.set_write_timeout(20);
    assert_eq!(stream.read_timeout(), 10);
    assert_eq!(stream.write_timeout(), 20);
}

#[test]
fn test_io_streamer() -> anyhow::Result<()> {
    let mut io = IoStreamer::new(MemoryStream::new());
    write!(io, "XYZHello, {}!", "world")?;
    assert_eq!(io.seek(SeekFrom::Start(3))?, 3);

    let mut s = String::new();
    io.read_to_string(&mut s)?;
    assert_eq!(s, "Hello, world!");
    assert_eq!(io.get_ref().len(), 16);
    Ok(())
}

#[test]
fn test_dyn_stream() -> anyhow::Result<()> {
    let mut streams: Vec<Box<dyn Stream>> =
        vec![Box::new(stream_with(b"one")), Box::new(stream_with(b"two"))];
    let contents = streams
        .iter_mut()
        .map(|stream| stream.read_all())
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(contents, [b"one".to_vec(), b"two".to_vec()]);
    Ok(())
}
