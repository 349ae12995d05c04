use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use crate::state::Snapshot;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_snapshot(snapshot: &Snapshot) -> io::Result<()> {
        Self::print_json(snapshot)
    }

    pub fn print_items(items: &[Value]) -> io::Result<()> {
        Self::print_json(&items)
    }

    pub fn print_redirect(redirect: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(redirect.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
