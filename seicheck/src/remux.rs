use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Arguments that copy the first video stream of `input_file` to stdout as an H.264 Annex B
/// elementary stream, without re-encoding.
fn annexb_args(input_file: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-i"].iter().map(OsString::from).collect();
    args.push(input_file.as_os_str().to_owned());
    args.extend(
        ["-c:v", "copy", "-bsf:v", "h264_mp4toannexb", "-f", "h264", "-"]
            .iter()
            .map(OsString::from),
    );
    args
}

/// Runs ffmpeg on a container file and returns the Annex B bytes it writes to stdout.
pub fn pull_annexb(ffmpeg: &Path, input_file: &Path) -> Result<Vec<u8>> {
    let args = annexb_args(input_file);
    debug!(ffmpeg = %ffmpeg.display(), ?args, "remuxing to Annex B");

    let output = Command::new(ffmpeg)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to run {}", ffmpeg.display()))?;

    if !output.status.success() {
        anyhow::bail!(
            "ffmpeg failed with exit code: {}\n{}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annexb_args() {
        let args = annexb_args(Path::new("out/lossy.mp4"));
        let args: Vec<&str> = args.iter().filter_map(|arg| arg.to_str()).collect();

        assert_eq!(
            args,
            vec![
                "-v",
                "error",
                "-i",
                "out/lossy.mp4",
                "-c:v",
                "copy",
                "-bsf:v",
                "h264_mp4toannexb",
                "-f",
                "h264",
                "-"
            ]
        );
    }

    #[test]
    fn test_missing_ffmpeg_is_an_error() {
        let result = pull_annexb(
            Path::new("/nonexistent/ffmpeg"),
            Path::new("out/lossy.mp4"),
        );
        assert!(result.is_err());
    }
}
