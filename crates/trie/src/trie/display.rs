//! Simple printing of the trie structure.

use std::fmt::{self, Display, Formatter};

use hextrie_store::Database;

use super::{Node, Trie};

impl<D: Database> Display for Trie<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.root {
            None => write!(f, "Trie {{ EMPTY }}"),
            Some(root) => fmt_node(f, root, 0),
        }
    }
}

fn fmt_node(f: &mut Formatter<'_>, node: &Node, indent: usize) -> fmt::Result {
    let pad = " ".repeat(indent);
    match node {
        Node::Leaf(value) => write!(f, "{pad}Leaf({} bytes)", value.len()),
        Node::Hashed(hash) => write!(f, "{pad}Hashed({hash})"),
        Node::Extension(ext) => {
            writeln!(f, "{pad}Extension({:x?})", ext.key)?;
            fmt_node(f, &ext.next, indent + 4)
        }
        Node::Branch(branch) => {
            write!(f, "{pad}Branch")?;
            for (i, child) in branch.children.iter().enumerate() {
                if let Some(child) = child {
                    writeln!(f, "\n{pad}  [{i:x}]")?;
                    fmt_node(f, child, indent + 4)?;
                }
            }
            Ok(())
        }
    }
}
