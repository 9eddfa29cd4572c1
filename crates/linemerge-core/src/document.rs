use anyhow::Context;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Split decoded text into lines. Handles `\n` and `\r\n`, drops a leading
/// byte order mark, and does not yield an empty line for a final newline.
pub fn split_lines(text: &str) -> Vec<String> {
    merge_engine::split_text(text)
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Read a UTF-8 text file as lines.
pub async fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    Ok(split_lines(&text))
}

/// Write lines, each followed by `\n`, to `dest` or to stdout.
pub async fn write_lines(dest: Option<&Path>, lines: &[String]) -> anyhow::Result<()> {
    let mut buf = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }

    match dest {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, buf)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(buf.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
