extern crate alloc;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use rgb::RGB;

/// Trie depth: one level per bit of each 8-bit channel.
const LEVELS: usize = 8;
/// Levels whose nodes are eligible for merge-down. Level-7 children are
/// created as leaves and never reduced.
const REDUCIBLE_LEVELS: usize = 7;

type NodeId = usize;

/// Arena-allocated octree node. Branch nodes carry no sums; a leaf's sums and
/// pixel count cover every pixel absorbed directly or via prior merges.
#[derive(Debug, Clone, Default)]
struct Node {
    is_leaf: bool,
    pixel_count: usize,
    sums: [u64; 3],
    children: [Option<NodeId>; 8],
}

/// One quantization run's octree: node arena, per-level reduction stacks, and
/// the live-leaf budget. Nothing here outlives or is shared across calls.
#[derive(Debug)]
struct Octree {
    nodes: Vec<Node>,
    /// Per-level stacks of branch nodes, most-recently-created last.
    reducible: [Vec<NodeId>; REDUCIBLE_LEVELS],
    leaf_count: usize,
    max_leaf_num: usize,
}

/// 3-bit branch key at `level`: bit `level` (MSB-first) of r, g, b.
fn branch_key(px: RGB<u8>, level: usize) -> usize {
    let bit = 7 - level;
    let r = (px.r >> bit) & 1;
    let g = (px.g >> bit) & 1;
    let b = (px.b >> bit) & 1;
    usize::from(r << 2 | g << 1 | b)
}

impl Octree {
    fn new(max_leaf_num: usize) -> Self {
        let mut nodes = Vec::new();
        nodes.push(Node::default()); // root
        Self {
            nodes,
            reducible: Default::default(),
            leaf_count: 0,
            max_leaf_num,
        }
    }

    fn alloc(&mut self, level: usize) -> NodeId {
        let id = self.nodes.len();
        let mut node = Node::default();
        if level == LEVELS - 1 {
            node.is_leaf = true;
            self.leaf_count += 1;
        } else {
            self.reducible[level].push(id);
        }
        self.nodes.push(node);
        id
    }

    /// Insert one pixel, then reduce until the live-leaf budget holds again.
    /// Iterative descent; the trie depth is fixed so no recursion is needed.
    fn insert(&mut self, px: RGB<u8>) {
        let mut id: NodeId = 0;
        for level in 0..LEVELS {
            if self.nodes[id].is_leaf {
                break;
            }
            let key = branch_key(px, level);
            id = match self.nodes[id].children[key] {
                Some(child) => child,
                None => {
                    let child = self.alloc(level);
                    self.nodes[id].children[key] = Some(child);
                    child
                }
            };
        }

        let leaf = &mut self.nodes[id];
        leaf.pixel_count += 1;
        leaf.sums[0] += u64::from(px.r);
        leaf.sums[1] += u64::from(px.g);
        leaf.sums[2] += u64::from(px.b);

        while self.leaf_count > self.max_leaf_num {
            if !self.reduce_deepest() {
                break;
            }
        }
    }

    /// Merge the most-recently-created node of the deepest non-empty level:
    /// fold every present child into it and turn it into a leaf. Children
    /// become unreachable once `is_leaf` is set. Returns false when no level
    /// has a reducible node left.
    fn reduce_deepest(&mut self) -> bool {
        let Some(id) = self
            .reducible
            .iter_mut()
            .rev()
            .find_map(|stack| stack.pop())
        else {
            return false;
        };

        let mut sums = [0u64; 3];
        let mut count = 0usize;
        for child in self.nodes[id].children.into_iter().flatten() {
            let child = &self.nodes[child];
            sums[0] += child.sums[0];
            sums[1] += child.sums[1];
            sums[2] += child.sums[2];
            count += child.pixel_count;
            self.leaf_count -= 1;
        }

        let node = &mut self.nodes[id];
        node.is_leaf = true;
        node.sums = sums;
        node.pixel_count = count;
        self.leaf_count += 1;
        true
    }

    /// Depth-first leaf walk, summing pixel counts of leaves whose truncated
    /// means land on the same 24-bit color.
    fn collect(&self) -> BTreeMap<[u8; 3], usize> {
        let mut colors = BTreeMap::new();
        let mut stack = alloc::vec![0 as NodeId];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf {
                let mean = if node.pixel_count == 0 {
                    [0, 0, 0]
                } else {
                    node.sums.map(|s| (s / node.pixel_count as u64) as u8)
                };
                *colors.entry(mean).or_insert(0) += node.pixel_count;
            } else {
                stack.extend(node.children.iter().rev().flatten());
            }
        }
        colors
    }
}

/// Octree quantization: insert every pixel into a depth-8 trie, merging the
/// deepest mergeable subtree whenever live leaves exceed `max_leaf_num`, then
/// rank the collected clusters by pixel count and keep `result_num`.
///
/// Returns (mean color, pixel count) pairs, descending by count.
pub fn octree(pixels: &[RGB<u8>], max_leaf_num: usize, result_num: usize) -> Vec<([u8; 3], usize)> {
    let mut tree = Octree::new(max_leaf_num);
    for &px in pixels {
        tree.insert(px);
    }

    let mut clusters: Vec<([u8; 3], usize)> = tree.collect().into_iter().collect();
    clusters.sort_by(|a, b| b.1.cmp(&a.1));
    clusters.truncate(result_num);
    clusters
}
