//! Tagger backed by the external `mystem` analyzer
//!
//! One process per document: words go to stdin one per line, and
//! `mystem -n -i --format json` answers with one JSON object per line:
//!
//! ```text
//! {"analysis":[{"lex":"кошка","gr":"S,жен,од=им,ед"}],"text":"кошка"}
//! ```
//!
//! The part of speech is the first grammeme of the first analysis.

use super::{PosTag, PosTagger};
use crate::error::TaggerError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const TOOL_NAME: &str = "mystem";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Deserialize)]
struct MystemWord {
    text: String,
    #[serde(default)]
    analysis: Vec<MystemAnalysis>,
}

#[derive(Debug, Deserialize)]
struct MystemAnalysis {
    #[serde(default)]
    gr: String,
}

/// Tagger that shells out to mystem
#[derive(Debug, Clone)]
pub struct MystemTagger {
    program: PathBuf,
    timeout_secs: u64,
}

impl MystemTagger {
    pub fn new(program: impl AsRef<Path>, timeout_secs: u64) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            timeout_secs,
        }
    }

    /// Run mystem once on a known word to confirm it starts and answers
    pub fn probe(&self) -> Result<(), TaggerError> {
        let stdout = self.run("кошка\n")?;
        let tags = parse_output(&stdout)?;
        if tags.is_empty() {
            return Err(TaggerError::BadOutput {
                tagger: TOOL_NAME.to_string(),
                detail: "probe produced no analysis".to_string(),
            });
        }
        Ok(())
    }

    /// Feed `input` to a fresh mystem process and return its stdout
    fn run(&self, input: &str) -> Result<String, TaggerError> {
        let mut child = Command::new(&self.program)
            .args(["-n", "-i", "--format", "json"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TaggerError::Unavailable {
                        tagger: TOOL_NAME.to_string(),
                        reason: format!("{} not found", self.program.display()),
                    }
                } else {
                    TaggerError::Spawn {
                        tagger: TOOL_NAME.to_string(),
                        source: e,
                    }
                }
            })?;

        // stdin/stdout/stderr are serviced on their own threads so a large
        // document cannot fill a pipe while we wait on the process
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_owned();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });
        let stdout_reader = child.stdout.take().map(|s| thread::spawn(move || read_all(s)));
        let stderr_reader = child.stderr.take().map(|s| thread::spawn(move || read_all(s)));

        let status = self.wait(&mut child)?;

        if let Some(handle) = writer {
            if let Ok(Err(e)) = handle.join() {
                debug!("mystem stdin closed early: {}", e);
            }
        }
        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);

        if !status.success() {
            return Err(TaggerError::Failed {
                tagger: TOOL_NAME.to_string(),
                status: status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(stdout)
    }

    /// Poll for exit, killing the process once the timeout passes
    fn wait(&self, child: &mut Child) -> Result<ExitStatus, TaggerError> {
        let start = Instant::now();
        let timeout = Duration::from_secs(self.timeout_secs);
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if self.timeout_secs > 0 && start.elapsed() > timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        warn!("{} timed out after {}s", TOOL_NAME, self.timeout_secs);
                        return Err(TaggerError::Timeout {
                            tagger: TOOL_NAME.to_string(),
                            secs: self.timeout_secs,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(TaggerError::Spawn {
                        tagger: TOOL_NAME.to_string(),
                        source: e,
                    })
                }
            }
        }
    }
}

impl PosTagger for MystemTagger {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn classify(&self, word: &str) -> Result<PosTag, TaggerError> {
        let tags = self.classify_all(&[word.to_string()])?;
        Ok(tags.first().copied().unwrap_or(PosTag::Other))
    }

    fn classify_all(&self, words: &[String]) -> Result<Vec<PosTag>, TaggerError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }
        let mut input = words.join("\n");
        input.push('\n');
        let stdout = self.run(&input)?;
        let tags = parse_output(&stdout)?;
        Ok(words
            .iter()
            .map(|w| tags.get(w).copied().unwrap_or(PosTag::Other))
            .collect())
    }
}

fn read_all(mut source: impl Read) -> std::io::Result<String> {
    let mut buf = Vec::new();
    source.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join_reader(handle: Option<thread::JoinHandle<std::io::Result<String>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .and_then(|r| r.ok())
        .unwrap_or_default()
}

/// Map each analysed word (lower-cased) to its tag.
///
/// Lines that do not parse are skipped; output with words in it but no
/// parseable line at all is an error.
fn parse_output(stdout: &str) -> Result<HashMap<String, PosTag>, TaggerError> {
    let mut tags = HashMap::new();
    let mut parsed_any = false;
    let mut nonempty = false;

    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        nonempty = true;
        let word: MystemWord = match serde_json::from_str(line) {
            Ok(w) => w,
            Err(e) => {
                debug!("Skipping mystem line {:?}: {}", line, e);
                continue;
            }
        };
        parsed_any = true;
        let tag = word
            .analysis
            .first()
            .map(|a| tag_from_grammemes(&a.gr))
            .unwrap_or(PosTag::Other);
        tags.entry(word.text.trim().to_lowercase()).or_insert(tag);
    }

    if nonempty && !parsed_any {
        return Err(TaggerError::BadOutput {
            tagger: TOOL_NAME.to_string(),
            detail: "no JSON lines in output".to_string(),
        });
    }
    Ok(tags)
}

/// `S` noun, `A` adjective, `V` verb (mystem grammeme codes)
fn tag_from_grammemes(gr: &str) -> PosTag {
    let pos = gr.split([',', '=']).next().unwrap_or("").trim();
    match pos {
        "S" => PosTag::Noun,
        "A" => PosTag::Adjective,
        "V" => PosTag::Verb,
        _ => PosTag::Other,
    }
}
