use std::future::Future;
use std::io::{self, Write};

use crate::errors::PublishError;

/// Destination for serialized events. The topic, if any, is bound at construction.
pub trait EventSink {
    fn send(
        &mut self,
        key: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Prints each event under a running `data is extracted N :` label.
pub struct ConsoleSink<W = io::Stdout> {
    out: W,
    extracted: u64,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        ConsoleSink::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        ConsoleSink { out, extracted: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, payload: &str) -> io::Result<()> {
        self.extracted += 1;
        writeln!(self.out, "data is extracted {} : ", self.extracted)?;
        writeln!(self.out, "{}", payload)?;
        self.out.flush()
    }
}

impl<W: Write + Send> EventSink for ConsoleSink<W> {
    async fn send(&mut self, _key: &str, payload: &str) -> Result<(), PublishError> {
        self.write_event(payload)?;
        Ok(())
    }
}
