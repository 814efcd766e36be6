use std::collections::HashMap;

use crate::Comment;

/// Reassemble the backend's flat comment list into reply threads.
///
/// A comment without a parent (or with `parent_id == 0`) is a root. Replies
/// attach to their parent; a comment whose parent is not in the list is
/// dropped together with anything replying to it. Roots and replies keep
/// backend order.
pub fn build_comment_tree(comments: Vec<Comment>) -> Vec<Comment> {
    let mut roots = Vec::new();
    let mut children: HashMap<i64, Vec<Comment>> = HashMap::new();

    for mut comment in comments {
        comment.replies.clear();
        match comment.parent_id.filter(|parent| *parent != 0) {
            Some(parent) => children.entry(parent).or_default().push(comment),
            None => roots.push(comment),
        }
    }

    roots
        .into_iter()
        .map(|root| attach_replies(root, &mut children))
        .collect()
}

fn attach_replies(mut comment: Comment, children: &mut HashMap<i64, Vec<Comment>>) -> Comment {
    // 取出后即从表中移除，重复 id 不会被挂两次
    if let Some(replies) = children.remove(&comment.id) {
        comment.replies = replies
            .into_iter()
            .map(|reply| attach_replies(reply, children))
            .collect();
    }
    comment
}

/// Total number of comments in a tree, replies included.
pub fn count_comments(tree: &[Comment]) -> usize {
    tree.iter()
        .map(|comment| 1 + count_comments(&comment.replies))
        .sum()
}
