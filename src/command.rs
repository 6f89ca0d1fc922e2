//! Argument vector assembly for one engine invocation.

use crate::error::{Error, Result};
use crate::format::{OutputFormat, OutputRequest};
use crate::lang::{Lang, LangToken};
use std::borrow::Cow;
use std::path::Path;

/// Page segmentation mode that restricts the engine to orientation and script detection.
pub const OSD_ONLY_PSM: &str = "0";

/// Inputs of [`build`].
#[derive(Debug, Clone)]
pub struct CommandSpec<'a> {
    pub command: &'a str,
    pub input: &'a Path,
    pub output_base: &'a Path,
    pub request: &'a OutputRequest,
    pub lang: &'a [LangToken],
    /// Free-form extra arguments, shell-token split.
    pub extra: Option<&'a str>,
}

/// A fully assembled invocation plus the non-fatal problems met while building it.
#[derive(Debug)]
pub struct EngineCommand {
    args: Vec<String>,
    pub warnings: Vec<Error>,
}

impl EngineCommand {
    /// Unescaped tokens; `args()[0]` is the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Single line that the runner splits back into exactly [`args`](Self::args).
    pub fn command_line(&self) -> Result<String> {
        let escaped = self
            .args
            .iter()
            .map(|a| escape_path(a))
            .collect::<Result<Vec<_>>>()?;
        Ok(escaped.join(" "))
    }
}

pub fn build(spec: &CommandSpec<'_>) -> Result<EngineCommand> {
    let mut warnings = Vec::new();
    let mut args = vec![
        spec.command.to_string(),
        spec.input.display().to_string(),
        spec.output_base.display().to_string(),
    ];

    let extra = match spec.extra.map(split_extra_args).transpose() {
        Ok(tokens) => tokens.unwrap_or_default(),
        Err(err) => {
            warnings.push(err);
            Vec::new()
        }
    };
    let has_psm = extra.iter().any(|t| is_psm_flag(t));
    args.extend(extra);

    if spec.request.contains(OutputFormat::Osd) && !has_psm {
        args.push("--psm".into());
        args.push(OSD_ONLY_PSM.into());
    }

    if !spec.lang.is_empty() {
        args.push("-l".into());
        args.push(Lang::join(spec.lang)?);
    }

    for format in spec.request.distinct() {
        args.extend(format.flags().iter().map(|f| f.to_string()));
    }

    Ok(EngineCommand { args, warnings })
}

pub fn split_extra_args(raw: &str) -> Result<Vec<String>> {
    shlex::split(raw).ok_or_else(|| Error::ExtraArgs {
        args: raw.to_string(),
        reason: "unbalanced quotes or trailing escape".into(),
    })
}

fn is_psm_flag(token: &str) -> bool {
    token == "--psm" || token == "-psm" || token.starts_with("--psm=")
}

/// Quote-wraps on Windows; elsewhere shell-quotes anything the tokenizer would split or choke on.
pub fn escape_path(s: &str) -> Result<String> {
    if cfg!(windows) {
        let needs_quotes = s.chars().any(|c| c.is_whitespace() || c == '\'');
        return Ok(if needs_quotes {
            format!("\"{s}\"")
        } else {
            s.to_string()
        });
    }
    shlex::try_quote(s)
        .map(Cow::into_owned)
        .map_err(|e| Error::CommandLine(format!("{s:?}: {e}")))
}
