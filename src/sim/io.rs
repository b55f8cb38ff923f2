//! Console output and keyboard input for the simulator.
//!
//! Output from the `OUT`/`PUTS` trap routines lands in a [`Console`], a
//! bounded circular buffer the debugger frontend renders from. Input for
//! the `GETC`/`IN` trap routines comes from a [`Keyboard`]:
//! - [`EmptyKeyboard`]: no input; every wait comes back empty.
//! - [`ChannelKeyboard`]: a channel-backed source whose [`KeyboardHandle`]
//!   end lives with the frontend; waits block until a key is sent.
//! - [`ScriptedKeyboard`]: a canned key sequence, mostly for tests.

use std::collections::VecDeque;

use crossbeam_channel as cbc;

const DEFAULT_CAPACITY: usize = 4096;

/// A bounded circular buffer of console output.
///
/// Characters are appended by the trap routines; once the buffer is full,
/// the oldest characters are overwritten. The frontend reads the contents
/// in emission order between steps.
///
/// ```
/// use lc3_solo::sim::io::Console;
///
/// let mut console = Console::with_capacity(2);
/// console.push(b'H');
/// console.push(b'I');
/// console.push(b'!');
/// assert_eq!(console.contents(), "I!"); // 'H' was overwritten
/// ```
#[derive(Debug, Clone)]
pub struct Console {
    buf: Box<[u8]>,
    /// Index of the oldest retained byte.
    head: usize,
    /// Logical length; always <= capacity.
    len: usize,
}

impl Console {
    /// Creates a console with the default capacity (4096 bytes).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a console with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "console capacity must be nonzero");
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// Appends one character, overwriting the oldest if full.
    pub fn push(&mut self, byte: u8) {
        let cap = self.buf.len();
        if self.len == cap {
            self.buf[self.head] = byte;
            self.head = (self.head + 1) % cap;
        } else {
            self.buf[(self.head + self.len) % cap] = byte;
            self.len += 1;
        }
    }

    /// The number of characters currently retained.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The buffer's fixed capacity.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Iterates the retained characters in emission order.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(|i| self.buf[(self.head + i) % self.buf.len()])
    }

    /// The retained output as a string (lossy for non-UTF-8 bytes).
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes().collect::<Vec<_>>()).into_owned()
    }

    /// Discards all retained output.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// A source of keyboard input for the `GETC`/`IN` trap routines.
pub trait Keyboard {
    /// Blocks until a key is available, returning it.
    ///
    /// Returns `None` when the source can never produce another key
    /// (disconnected channel, drained script). The simulator treats that
    /// as a NUL keypress so an input trap cannot wedge the machine.
    fn wait_key(&mut self) -> Option<u8>;
}
impl dyn Keyboard {} // assert Keyboard is dyn safe

/// No input. Every wait comes back empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyKeyboard;
impl Keyboard for EmptyKeyboard {
    fn wait_key(&mut self) -> Option<u8> {
        None
    }
}

/// A channel-backed keyboard source.
///
/// The simulator holds the receiving end; the frontend keeps the
/// [`KeyboardHandle`] and sends a byte per keypress. A wait blocks the run
/// loop until a key arrives, which is the design's only suspension point.
#[derive(Debug)]
pub struct ChannelKeyboard {
    keys: cbc::Receiver<u8>,
}

/// The sending end of a [`ChannelKeyboard`].
#[derive(Debug, Clone)]
pub struct KeyboardHandle {
    keys: cbc::Sender<u8>,
}

impl ChannelKeyboard {
    /// Creates a keyboard source and the handle that feeds it.
    pub fn new() -> (Self, KeyboardHandle) {
        let (tx, rx) = cbc::unbounded();
        (Self { keys: rx }, KeyboardHandle { keys: tx })
    }
}
impl Keyboard for ChannelKeyboard {
    fn wait_key(&mut self) -> Option<u8> {
        // Blocks until a key is sent; errors only when every handle is gone.
        self.keys.recv().ok()
    }
}

impl KeyboardHandle {
    /// Queues one keypress. Returns false if the simulator side is gone.
    pub fn press(&self, key: u8) -> bool {
        self.keys.send(key).is_ok()
    }

    /// Queues a sequence of keypresses.
    pub fn type_str(&self, keys: &str) -> bool {
        keys.bytes().all(|b| self.press(b))
    }
}

/// A canned sequence of keypresses, consumed front to back.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeyboard {
    keys: VecDeque<u8>,
}
impl ScriptedKeyboard {
    /// Creates a scripted source from a byte sequence.
    pub fn new(keys: impl IntoIterator<Item = u8>) -> Self {
        Self { keys: keys.into_iter().collect() }
    }
}
impl Keyboard for ScriptedKeyboard {
    fn wait_key(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }
}
