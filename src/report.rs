//! The one line of tab-separated output printed per file.

use crate::aiff::{CommonChunk, FormType, ParsedFile};

const UNCOMPRESSED_NAME: &str = "not compressed";

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub form: FormType,
    pub common: CommonChunk,
    pub compression_name: Option<String>,
    /// Requested rate, present when a rewrite (or dry run) was asked for.
    pub new_rate: Option<u32>,
}

impl FileReport {
    pub fn new(name: &str, parsed: &ParsedFile, new_rate: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            form: parsed.form,
            common: parsed.common.common,
            compression_name: parsed.common.chunk.compression_name().map(str::to_string),
            new_rate,
        }
    }

    pub fn line(&self, verbose: bool) -> String {
        let rate = self.common.sample_rate.to_f64();
        let mut line = if verbose {
            format!(
                "{}\t{}\t{}\t{}\t{:.0}\t{}\t{}",
                self.name,
                self.common.num_channels,
                self.common.num_sample_frames,
                self.common.sample_size,
                rate,
                self.form.name(),
                self.compression_name.as_deref().unwrap_or(UNCOMPRESSED_NAME)
            )
        } else {
            format!("{}\t{:.0}", self.name, rate)
        };

        if let Some(new_rate) = self.new_rate {
            line.push_str(&format!("\tsample rate reset to: {new_rate}"));
        }
        line
    }
}
