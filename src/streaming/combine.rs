use futures::stream::{self, StreamExt};

use crate::io::RecordStream;

/// How several input streams are joined into one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamCombinator {
    /// Interleave records as each input produces them
    #[default]
    Merge,

    /// Read inputs one after another, in the order given
    Chain,
}

/// Join record streams into one; a single stream is returned as is
pub fn combine(mut streams: Vec<RecordStream>, combinator: StreamCombinator) -> RecordStream {
    if streams.len() == 1
        && let Some(only) = streams.pop()
    {
        return only;
    }

    match combinator {
        StreamCombinator::Merge => Box::pin(stream::select_all(streams)),
        StreamCombinator::Chain => Box::pin(stream::iter(streams).flatten()),
    }
}
