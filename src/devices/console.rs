//! Bounded text console.

use std::collections::VecDeque;

use super::LogSink;

/// Number of lines kept before the oldest is dropped.
pub const CONSOLE_LINES: usize = 100;

/// Log sink that keeps the most recent messages, like a scrolling console.
///
/// Every message is also passed on to the `log` facade.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl ConsoleLog {
    /// Console holding the last [`CONSOLE_LINES`] messages.
    pub fn new() -> Self {
        Self::with_capacity(CONSOLE_LINES)
    }

    /// Console holding at most `capacity` messages (minimum one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Retained lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// True if any retained line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ConsoleLog {
    fn log(&mut self, message: &str) {
        log::info!("{}", message);

        self.lines.push_back(message.to_string());
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_drops_oldest_line() {
        let mut console = ConsoleLog::with_capacity(2);

        console.log("one");
        console.log("two");
        console.log("three");

        assert_eq!(console.lines().collect::<Vec<_>>(), vec!["two", "three"]);
        assert_eq!(console.last(), Some("three"));
        assert!(!console.contains("one"));
    }

    #[test]
    fn test_default_capacity() {
        let mut console = ConsoleLog::new();
        for i in 0..150 {
            console.log(&format!("line {}", i));
        }

        assert_eq!(console.len(), CONSOLE_LINES);
        assert_eq!(console.lines().next(), Some("line 50"));
    }
}
