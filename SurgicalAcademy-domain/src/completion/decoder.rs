use std::fmt::Display;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use super::CompletionError;

/// Incremental UTF-8 decoder for network chunks.
///
/// A multi-byte character split across chunks is held back until the rest
/// arrives. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `pending + bytes` as is complete
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to guarantees this prefix is UTF-8
                    out.push_str(&String::from_utf8_lossy(valid));

                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // incomplete sequence at the end: wait for more bytes
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = rest.to_vec();
        out
    }

    /// Flush whatever is left, replacing an unfinished sequence
    pub fn finish(&mut self) -> String {
        let rest = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&rest).into_owned()
    }
}

/// Turn a byte stream into a stream of text chunks, in arrival order.
///
/// Empty decodes are skipped; a transport error ends the stream with
/// [`CompletionError::Stream`].
pub fn decode_utf8_stream<S, B, E>(inner: S) -> BoxStream<'static, Result<String, CompletionError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let initial = Some((Box::pin(inner), Utf8ChunkDecoder::new()));

    stream::unfold(initial, |state| async move {
        let (mut inner, mut decoder) = state?;

        loop {
            match inner.next().await {
                Some(Ok(bytes)) => {
                    let text = decoder.push(bytes.as_ref());
                    if !text.is_empty() {
                        return Some((Ok(text), Some((inner, decoder))));
                    }
                }
                Some(Err(e)) => {
                    return Some((Err(CompletionError::Stream(e.to_string())), None));
                }
                None => {
                    let rest = decoder.finish();
                    return if rest.is_empty() { None } else { Some((Ok(rest), None)) };
                }
            }
        }
    })
    .boxed()
}
