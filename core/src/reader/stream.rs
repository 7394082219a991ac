use crate::prelude::{format_error, AcmiResult};
use std::io::BufRead;

/// Marker a physical line ends with when the sentence continues on the next line.
pub const LINE_CONTINUATION: char = '\\';

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Anything that yields logical sentences one at a time.
pub trait SentenceSource {
    fn next_sentence(&mut self) -> AcmiResult<Option<String>>;
    fn eof(&self) -> bool;
}

/// Assembles physical lines from a buffered reader into logical sentences.
pub struct SentenceStream {
    inner: Box<dyn BufRead>,
    buffer: Vec<u8>,
    first_line: bool,
    eof: bool,
}

impl SentenceStream {
    pub fn new<R: BufRead + 'static>(reader: R) -> Self {
        Self {
            inner: Box::new(reader),
            buffer: Vec::with_capacity(4096),
            first_line: true,
            eof: false,
        }
    }

    /// Reads one physical line including its line terminator.
    pub fn next_line(&mut self) -> AcmiResult<Option<String>> {
        if self.eof {
            return Ok(None);
        }

        self.buffer.clear();
        let read = self.inner.read_until(b'\n', &mut self.buffer)?;
        if read == 0 {
            self.eof = true;
            return Ok(None);
        }

        let mut line = std::str::from_utf8(&self.buffer)
            .map_err(|err| format_error!("recording is not valid UTF-8: {}", err))?
            .to_string();
        if self.first_line {
            self.first_line = false;
            if let Some(stripped) = line.strip_prefix(BYTE_ORDER_MARK) {
                line = stripped.to_string();
            }
        }
        Ok(Some(line))
    }
}

impl SentenceSource for SentenceStream {
    fn next_sentence(&mut self) -> AcmiResult<Option<String>> {
        let mut sentence = String::new();
        let mut consumed = false;

        while let Some(line) = self.next_line()? {
            consumed = true;
            match continued_body(&line) {
                Some(body) => {
                    sentence.push_str(body);
                    sentence.push('\n');
                }
                None => {
                    sentence.push_str(&line);
                    return Ok(Some(sentence.trim().to_string()));
                }
            }
        }

        Ok(consumed.then(|| sentence.trim().to_string()))
    }

    fn eof(&self) -> bool {
        self.eof
    }
}

/// Physical form of a sentence: every embedded line break gets its
/// continuation marker back.
pub fn encode_sentence(sentence: &str) -> String {
    sentence.replace('\n', &format!("{}\n", LINE_CONTINUATION))
}

/// Returns the line without its continuation marker if the sentence goes on.
fn continued_body(line: &str) -> Option<&str> {
    let body = line.strip_suffix('\n')?;
    let body = body.strip_suffix('\r').unwrap_or(body);
    body.strip_suffix(LINE_CONTINUATION)
}
