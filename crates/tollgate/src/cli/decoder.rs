//! Stdin line decoder
//!
//! Each stdin line is one decoded presentation, the way serial and
//! keyboard-wedge QR scanners deliver codes. A reader thread feeds a
//! channel so the session's tick loop never blocks on input; a blank line
//! (or an empty channel) is "no code in this frame".

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use tollgate::checkin::{CheckinError, Decode, Decoder, Result};

/// Non-blocking decoder over stdin lines.
pub struct StdinDecoder {
    rx: Receiver<String>,
}

impl StdinDecoder {
    /// Spawn the reader thread. Fails with `InputUnavailable` if the
    /// thread cannot be started; stdin read errors end the stream.
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("stdin-decoder".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| CheckinError::InputUnavailable(e.to_string()))?;
        Ok(Self { rx })
    }
}

impl Decoder for StdinDecoder {
    fn decode(&mut self) -> Result<Decode> {
        match self.rx.try_recv() {
            Ok(line) if line.trim().is_empty() => Ok(Decode::NoCode),
            Ok(line) => Ok(Decode::Code(line)),
            Err(TryRecvError::Empty) => Ok(Decode::NoCode),
            Err(TryRecvError::Disconnected) => Ok(Decode::EndOfInput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Decoder over a channel we feed directly; spawn() wires the same
    // receiver to a stdin reader thread.
    fn decoder_with_sender() -> (mpsc::Sender<String>, StdinDecoder) {
        let (tx, rx) = mpsc::channel();
        (tx, StdinDecoder { rx })
    }

    #[test]
    fn test_empty_channel_is_no_code() {
        let (_tx, mut decoder) = decoder_with_sender();
        assert_eq!(decoder.decode().unwrap(), Decode::NoCode);
    }

    #[test]
    fn test_line_is_code() {
        let (tx, mut decoder) = decoder_with_sender();
        tx.send("TOKEN001".to_string()).unwrap();
        assert_eq!(
            decoder.decode().unwrap(),
            Decode::Code("TOKEN001".to_string())
        );
    }

    #[test]
    fn test_blank_line_is_no_code() {
        let (tx, mut decoder) = decoder_with_sender();
        tx.send("   ".to_string()).unwrap();
        assert_eq!(decoder.decode().unwrap(), Decode::NoCode);
    }

    #[test]
    fn test_disconnected_is_end_of_input() {
        let (tx, mut decoder) = decoder_with_sender();
        drop(tx);
        assert_eq!(decoder.decode().unwrap(), Decode::EndOfInput);
    }
}
