use byte_streams::{MemoryStream, SeekOrigin, Stream};

fn main() -> anyhow::Result<()> {
    let mut memory = MemoryStream::from(b"123hello world456".to_vec());

    // Start at offset 3 and read 11 bytes from input.
    memory.seek(3, SeekOrigin::Beginning)?;
    let buf = memory.read_exact(11)?;

    // Then copy them to standard output.
    #[cfg(not(windows))]
    {
        let mut stdout = byte_streams::stdout()
            .lock()
            .map_err(|_| anyhow::anyhow!("stdout lock poisoned"))?;
        stdout.write_all(&buf)?;
        stdout.write_u8(b'\n')?;
    }
    #[cfg(windows)]
    println!("{}", String::from_utf8_lossy(&buf));
    Ok(())
}
