//! Reconstructs a renderable tree of content blocks from the flat,
//! paginated child listings the API hands back.
//!
//! [`build_tree`] does the fetching: depth-first, strictly sequential, one
//! level at a time. [`merge_runs`] is the pure pass that coalesces adjacent
//! list items of the same kind into one node's run so the renderer can emit
//! a single `<ul>`/`<ol>` for the whole group. The fetch returns immutable
//! records and the merge produces new nodes; nothing is mutated after
//! construction.

use crate::block::Block;
use crate::client::{self, list_children, Api};
use std::fmt;

/// A [`Block`] augmented with its resolved descendants.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockNode {
    pub block: Block,

    /// The block's nested children, in server order. Non-empty only when
    /// the block's `has_children` flag was set.
    pub children: Vec<BlockNode>,

    /// Subsequent flat siblings of the identical list-item kind, absorbed
    /// into this node by [`merge_runs`]. Non-empty only for bulleted and
    /// numbered list items that head a run.
    pub run: Vec<BlockNode>,
}

impl BlockNode {
    /// Wraps a block with no descendants resolved yet.
    pub fn leaf(block: Block) -> BlockNode {
        BlockNode {
            block,
            children: Vec::new(),
            run: Vec::new(),
        }
    }
}

/// Fetches and merges the full descendant tree under `block_id`, returning
/// the root's merged children.
///
/// Children are resolved before the merge pass sees their parent, and every
/// fetch is sequential: the remote's ordering is load-bearing and bursts
/// would trip its rate limits.
pub fn build_tree<A: Api + ?Sized>(api: &A, block_id: &str) -> Result<Vec<BlockNode>> {
    let flat = list_children(api, block_id)?;
    let mut nodes = Vec::with_capacity(flat.len());
    for block in flat {
        let children = match block.has_children {
            true => build_tree(api, &block.id)?,
            false => Vec::new(),
        };
        nodes.push(BlockNode {
            block,
            children,
            run: Vec::new(),
        });
    }
    merge_runs(nodes)
}

/// The left-to-right merge pass. The first element always starts the
/// output; each subsequent element is absorbed into the last *output*
/// node's run iff both are list items of the identical kind. Comparing
/// against the output node (the run's head) rather than the previous input
/// element is what lets a run keep absorbing.
pub fn merge_runs(nodes: Vec<BlockNode>) -> Result<Vec<BlockNode>> {
    let mut merged: Vec<BlockNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let absorb = match (
            merged.last().and_then(|head| head.block.payload.list_kind()),
            node.block.payload.list_kind(),
        ) {
            (Some(head), Some(item)) => head == item,
            _ => false,
        };
        if absorb {
            match merged.last_mut() {
                Some(head) => head.run.push(node),
                None => return Err(Error::MalformedTree),
            }
        } else {
            merged.push(node);
        }
    }
    Ok(merged)
}

/// The result of a fallible tree-building operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error while building a block tree.
#[derive(Debug)]
pub enum Error {
    /// Returned when fetching a level of children fails.
    Fetch(client::Error),

    /// Returned if the merge pass finds no output node to absorb into.
    /// This is an internal invariant violation, not a remote failure.
    MalformedTree,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Fetch(err) => err.fmt(f),
            Error::MalformedTree => write!(f, "Merge pass lost its output list"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Fetch(err) => Some(err),
            Error::MalformedTree => None,
        }
    }
}

impl From<client::Error> for Error {
    /// Converts client errors into [`Error`]. This allows us to use the `?`
    /// operator around child fetches.
    fn from(err: client::Error) -> Error {
        Error::Fetch(err)
    }
}
