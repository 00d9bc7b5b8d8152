//! The block tree: nodes allocated in a `typed_arena::Arena` and linked
//! through `Cell`s, so a whole tree can be built through shared
//! references and dropped in one go with its arena.

use std::cell::Cell;
use std::fmt;

/// A node of the block tree.
pub struct Node<'a, T: 'a> {
    parent: Cell<Option<&'a Node<'a, T>>>,
    previous_sibling: Cell<Option<&'a Node<'a, T>>>,
    next_sibling: Cell<Option<&'a Node<'a, T>>>,
    first_child: Cell<Option<&'a Node<'a, T>>>,
    last_child: Cell<Option<&'a Node<'a, T>>>,

    /// The data held by the node.
    pub data: T,
}

impl<'a, T: 'a> fmt::Debug for Node<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node")
            .field("data", &self.data)
            .field("children", &self.children().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> Node<'a, T> {
    /// Wrap `data` in an unlinked node, ready to be moved into an arena.
    pub fn new(data: T) -> Node<'a, T> {
        Node {
            parent: Cell::new(None),
            previous_sibling: Cell::new(None),
            next_sibling: Cell::new(None),
            first_child: Cell::new(None),
            last_child: Cell::new(None),
            data,
        }
    }

    pub fn parent(&self) -> Option<&'a Node<'a, T>> {
        self.parent.get()
    }

    pub fn first_child(&self) -> Option<&'a Node<'a, T>> {
        self.first_child.get()
    }

    pub fn last_child(&self) -> Option<&'a Node<'a, T>> {
        self.last_child.get()
    }

    pub fn previous_sibling(&self) -> Option<&'a Node<'a, T>> {
        self.previous_sibling.get()
    }

    pub fn next_sibling(&self) -> Option<&'a Node<'a, T>> {
        self.next_sibling.get()
    }

    /// Whether `self` and `other` are the same allocation.
    pub fn same_node(&self, other: &Node<'a, T>) -> bool {
        std::ptr::eq(self, other)
    }

    /// Iterate over this node's children, in order.
    pub fn children(&self) -> Children<'a, T> {
        Children(self.first_child.get())
    }

    /// Iterate over this node and every node below it, parents first.
    pub fn descendants(&'a self) -> Descendants<'a, T> {
        Descendants {
            root: self,
            next: Some(self),
        }
    }

    /// Append `new_child` after this node's existing children.
    ///
    /// `new_child` must not already be linked into a tree.
    pub fn append(&'a self, new_child: &'a Node<'a, T>) {
        debug_assert!(new_child.parent.get().is_none());
        new_child.parent.set(Some(self));
        if let Some(last_child) = self.last_child.take() {
            debug_assert!(last_child.next_sibling.get().is_none());
            new_child.previous_sibling.set(Some(last_child));
            last_child.next_sibling.set(Some(new_child));
        } else {
            debug_assert!(self.first_child.get().is_none());
            self.first_child.set(Some(new_child));
        }
        self.last_child.set(Some(new_child));
    }
}

/// Iterator over the children of a node.
#[derive(Debug)]
pub struct Children<'a, T: 'a>(Option<&'a Node<'a, T>>);

impl<'a, T> Iterator for Children<'a, T> {
    type Item = &'a Node<'a, T>;

    fn next(&mut self) -> Option<&'a Node<'a, T>> {
        let node = self.0.take()?;
        self.0 = node.next_sibling.get();
        Some(node)
    }
}

/// Pre-order iterator over a subtree.
#[derive(Debug)]
pub struct Descendants<'a, T: 'a> {
    root: &'a Node<'a, T>,
    next: Option<&'a Node<'a, T>>,
}

impl<'a, T> Iterator for Descendants<'a, T> {
    type Item = &'a Node<'a, T>;

    fn next(&mut self) -> Option<&'a Node<'a, T>> {
        let node = self.next.take()?;
        self.next = node.first_child.get().or_else(|| {
            let mut cur = node;
            loop {
                if cur.same_node(self.root) {
                    return None;
                }
                if let Some(sibling) = cur.next_sibling.get() {
                    return Some(sibling);
                }
                cur = cur.parent.get()?;
            }
        });
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::Node;
    use typed_arena::Arena;

    #[test]
    fn append_and_walk() {
        let arena = Arena::new();
        let root = arena.alloc(Node::new(0));
        let a = arena.alloc(Node::new(1));
        let b = arena.alloc(Node::new(2));
        let c = arena.alloc(Node::new(3));
        root.append(a);
        root.append(b);
        a.append(c);

        let order = root.descendants().map(|n| n.data).collect::<Vec<_>>();
        assert_eq!(order, vec![0, 1, 3, 2]);
        let kids = root.children().map(|n| n.data).collect::<Vec<_>>();
        assert_eq!(kids, vec![1, 2]);
        assert!(c.parent().unwrap().same_node(a));
        assert!(b.previous_sibling().unwrap().same_node(a));
        assert!(a.next_sibling().unwrap().same_node(b));
        assert!(root.last_child().unwrap().same_node(b));
        assert!(a.descendants().map(|n| n.data).eq(vec![1, 3]));
    }

    #[test]
    fn iterators_debug() {
        let arena = Arena::new();
        let root = arena.alloc(Node::new(0));
        let leaf = arena.alloc(Node::new(1));
        root.append(leaf);

        assert_eq!(
            format!("{:?}", root.children()),
            "Children(Some(Node { data: 1, children: [] }))"
        );
        assert_eq!(format!("{:?}", leaf.children()), "Children(None)");

        let mut walk = leaf.descendants();
        walk.next();
        assert_eq!(
            format!("{:?}", walk),
            "Descendants { root: Node { data: 1, children: [] }, next: None }"
        );
    }
}
