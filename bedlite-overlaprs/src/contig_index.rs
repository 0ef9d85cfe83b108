use std::sync::OnceLock;

use log::debug;
use num_traits::{PrimInt, Unsigned};

/// Whether a [`ContigIndex`] has an up-to-date search tree.
///
/// Every index starts `Unindexed`. The first query builds the tree and moves
/// it to `Indexed`; any later [`ContigIndex::add`] drops the tree and moves it
/// back to `Unindexed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Unindexed,
    Indexed,
}

/// One stored value together with its normalized coordinates.
#[derive(Debug, Clone)]
pub struct Entry<I, T> {
    pub start: I,
    pub end: I,
    pub negative: bool,
    pub val: T,
}

/// A node of the implicit tree: coordinates plus the position of the entry
/// in insertion order.
#[derive(Debug, Clone, Copy)]
struct Node<I> {
    start: I,
    end: I,
    index: usize,
}

///
/// The augmented search structure over one contig's entries.
///
/// `nodes` is sorted by start (ties in insertion order) and read as an
/// implicit binary tree: node `i` has children `2i + 1` and `2i + 2`. Because
/// children always sit later in the array, every node in a subtree starts at
/// or after the subtree root. `max_ends[i]` is the largest end anywhere in the
/// subtree rooted at `i`.
///
#[derive(Debug, Clone)]
struct AugmentedTree<I> {
    nodes: Vec<Node<I>>,
    max_ends: Vec<I>,
}

impl<I> AugmentedTree<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    fn build<T>(entries: &[Entry<I, T>]) -> Self {
        let mut nodes: Vec<Node<I>> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Node {
                start: entry.start,
                end: entry.end,
                index,
            })
            .collect();

        // stable: equal starts stay in insertion order
        nodes.sort_by_key(|node| node.start);

        let mut max_ends: Vec<I> = nodes.iter().map(|node| node.end).collect();
        for i in (0..nodes.len()).rev() {
            for child in [2 * i + 1, 2 * i + 2] {
                if child < nodes.len() && max_ends[child] > max_ends[i] {
                    max_ends[i] = max_ends[child];
                }
            }
        }

        AugmentedTree { nodes, max_ends }
    }
}

///
/// All intervals registered under a single contig, with a lazily built
/// augmented tree for overlap queries.
///
/// Insertion is O(1) and only marks the index as stale; the O(n log n) build
/// happens on the next query, so bulk loads pay for it once. Queries take
/// `&self`: once built, an index can be searched from many threads at once.
///
/// ```
/// use bedlite_overlaprs::{ContigIndex, IndexState};
///
/// let mut index: ContigIndex<u32, &str> = ContigIndex::new();
/// index.add(10, 20, false, "a");
/// index.add(15, 25, false, "b");
/// index.add(30, 40, true, "c");
/// assert_eq!(index.state(), IndexState::Unindexed);
///
/// let mut hits = index.find(18, 32);
/// hits.sort();
/// assert_eq!(hits, vec![0, 1, 2]);
/// assert_eq!(index.state(), IndexState::Indexed);
/// ```
#[derive(Debug)]
pub struct ContigIndex<I, T> {
    entries: Vec<Entry<I, T>>,
    tree: OnceLock<AugmentedTree<I>>,
}

impl<I, T> Default for ContigIndex<I, T> {
    fn default() -> Self {
        ContigIndex {
            entries: Vec::new(),
            tree: OnceLock::new(),
        }
    }
}

impl<I, T> ContigIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Append an entry and mark the index stale.
    ///
    /// Coordinates are trusted here; callers normalize them first.
    ///
    /// # Returns
    /// - the entry's position in insertion order
    pub fn add(&mut self, start: I, end: I, negative: bool, val: T) -> usize {
        self.entries.push(Entry {
            start,
            end,
            negative,
            val,
        });
        self.tree.take();
        self.entries.len() - 1
    }

    pub fn state(&self) -> IndexState {
        match self.tree.get() {
            Some(_) => IndexState::Indexed,
            None => IndexState::Unindexed,
        }
    }

    /// Build the augmented tree if any entry was added since the last build.
    pub fn ensure_indexed(&self) {
        self.tree();
    }

    fn tree(&self) -> &AugmentedTree<I> {
        self.tree.get_or_init(|| {
            debug!("indexing contig with {} intervals", self.entries.len());
            AugmentedTree::build(&self.entries)
        })
    }

    /// Insertion-order positions of every entry overlapping `[start, end)`.
    pub fn find(&self, start: I, end: I) -> Vec<usize> {
        self.find_iter(start, end).collect()
    }

    ///
    /// Lazily yield the insertion-order positions of every entry overlapping
    /// `[start, end)`. The order follows the tree walk, not insertion.
    ///
    pub fn find_iter(&self, start: I, end: I) -> IterFind<'_, I> {
        IterFind::new(self.tree(), start, end)
    }

    /// `true` if any entry overlaps `[start, end)`; stops at the first hit.
    pub fn overlaps_any(&self, start: I, end: I) -> bool {
        self.find_iter(start, end).next().is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<I, T>> {
        self.entries.get(index)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry<I, T>] {
        &self.entries
    }

    /// Returns the number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entry was ever added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

///
/// Depth-first walk of an [`AugmentedTree`] with an explicit stack.
///
/// At each node `i`:
/// 1. if `max_ends[i] <= start` nothing below can reach the query; skip the subtree
/// 2. if the node starts at or after `end`, so does everything below it; skip
/// 3. otherwise push the right child, then the left, and report the node itself
///    if it overlaps
///
/// The left child is popped before the right one, so smaller starts are
/// reported first within each subtree.
///
#[derive(Debug)]
pub struct IterFind<'a, I> {
    tree: &'a AugmentedTree<I>,
    stack: Vec<usize>,
    start: I,
    end: I,
}

impl<'a, I> IterFind<'a, I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    fn new(tree: &'a AugmentedTree<I>, start: I, end: I) -> Self {
        let mut stack = Vec::new();
        if !tree.nodes.is_empty() {
            stack.push(0);
        }
        IterFind {
            tree,
            stack,
            start,
            end,
        }
    }
}

impl<I> Iterator for IterFind<'_, I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.tree.nodes.len();
        while let Some(i) = self.stack.pop() {
            if self.tree.max_ends[i] <= self.start {
                continue;
            }
            let node = self.tree.nodes[i];
            if node.start >= self.end {
                continue;
            }

            let (left, right) = (2 * i + 1, 2 * i + 2);
            if right < len {
                self.stack.push(right);
            }
            if left < len {
                self.stack.push(left);
            }

            // maintain start inclusive, end exclusive
            if node.end > self.start {
                return Some(node.index);
            }
        }
        None
    }
}
