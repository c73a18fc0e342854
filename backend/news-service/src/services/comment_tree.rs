/// Comment tree construction
///
/// Turns the flat list of approved comments of one article into the nested
/// reply forest the article page renders. The list is indexed once by parent
/// id and then assembled top-down with an explicit stack.
use crate::models::{Comment, CommentTreeNode};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Deepest reply level a tree node may sit at. Deeper replies are lifted to
/// this level, next to the reply they answered.
pub const MAX_REPLY_DEPTH: usize = 32;

/// Build the reply forest for one article's approved comments.
///
/// Roots are comments without a parent (`None` or `0`). Roots and siblings are
/// ordered by creation time, then id. A comment whose parent is not in `comments`
/// is never reached and is left out. Each input comment is emitted at most once,
/// so self-references and cycles cannot loop. Threads nested deeper than
/// [`MAX_REPLY_DEPTH`] are flattened onto the deepest allowed level.
pub fn build_comment_tree(comments: &[Comment]) -> Vec<CommentTreeNode> {
    let mut roots: Vec<usize> = Vec::new();
    let mut children: HashMap<i64, Vec<usize>> = HashMap::with_capacity(comments.len());

    for (idx, comment) in comments.iter().enumerate() {
        match comment.parent() {
            Some(parent_id) => children.entry(parent_id).or_default().push(idx),
            None => roots.push(idx),
        }
    }

    let chronological = |a: &usize, b: &usize| posted_order(&comments[*a], &comments[*b]);
    roots.sort_by(chronological);
    for siblings in children.values_mut() {
        siblings.sort_by(chronological);
    }

    let mut emitted: HashSet<usize> = HashSet::with_capacity(comments.len());
    roots
        .into_iter()
        .filter_map(|root| assemble(root, comments, &children, &mut emitted))
        .collect()
}

fn posted_order(a: &Comment, b: &Comment) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Materialise the subtree under `root`.
///
/// A pre-order walk records, for every reached node, the replies it holds.
/// A node at [`MAX_REPLY_DEPTH`] hands its own replies to the node holding it.
/// Walking the pre-order backwards visits every reply before its holder, so
/// each node can be built from already-finished replies.
fn assemble(
    root: usize,
    comments: &[Comment],
    children: &HashMap<i64, Vec<usize>>,
    emitted: &mut HashSet<usize>,
) -> Option<CommentTreeNode> {
    if !emitted.insert(root) {
        return None;
    }

    let mut preorder: Vec<usize> = Vec::new();
    let mut held: HashMap<usize, Vec<usize>> = HashMap::new();
    // (comment, depth, node whose replies it sits in)
    let mut stack: Vec<(usize, usize, usize)> = vec![(root, 0, root)];

    while let Some((idx, depth, holder)) = stack.pop() {
        preorder.push(idx);

        let Some(siblings) = children.get(&comments[idx].id) else {
            continue;
        };
        let (target, reply_depth) = if depth < MAX_REPLY_DEPTH {
            (idx, depth + 1)
        } else {
            (holder, depth)
        };

        for child in siblings.iter().copied() {
            if emitted.insert(child) {
                held.entry(target).or_default().push(child);
                stack.push((child, reply_depth, target));
            }
        }
    }

    let mut finished: HashMap<usize, CommentTreeNode> = HashMap::with_capacity(preorder.len());
    for idx in preorder.into_iter().rev() {
        let mut replies = held.remove(&idx).unwrap_or_default();
        replies.sort_by(|a, b| posted_order(&comments[*a], &comments[*b]));
        let replies = replies
            .into_iter()
            .filter_map(|child| finished.remove(&child))
            .collect();
        finished.insert(idx, CommentTreeNode::new(&comments[idx], replies));
    }

    finished.remove(&root)
}
