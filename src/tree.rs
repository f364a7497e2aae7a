use crate::error::{Error, Result};
use crate::frequency::{FrequencyTable, Symbol};
use crate::queue::{MinQueue, Weighted};

#[derive(Debug, PartialEq, Eq)]
pub enum NodeType {
    Leaf(Symbol),
    Internal(Box<Node>, Box<Node>),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Node {
    node_type: NodeType,
    weight: u64,
}

impl Node {
    fn new_leaf(symbol: Symbol, weight: u64) -> Self {
        Node {
            node_type: NodeType::Leaf(symbol),
            weight,
        }
    }

    fn new_internal(left: Node, right: Node) -> Self {
        Node {
            weight: left.weight + right.weight,
            node_type: NodeType::Internal(Box::new(left), Box::new(right)),
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self.node_type {
            NodeType::Leaf(symbol) => Some(symbol),
            NodeType::Internal(..) => None,
        }
    }

    pub fn children(&self) -> Option<(&Node, &Node)> {
        match &self.node_type {
            NodeType::Leaf(_) => None,
            NodeType::Internal(left, right) => Some((left, right)),
        }
    }
}

impl Weighted for Node {
    fn weight(&self) -> u64 {
        self.weight
    }
}

/// Huffman tree built from a frequency table. Dropping it releases every node.
#[derive(Debug)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::EmptyAlphabet);
        }

        let mut pqueue = MinQueue::new();
        for (symbol, count) in table.present() {
            pqueue.insert(Node::new_leaf(symbol, count))?;
        }

        while pqueue.len() > 1 {
            let (Some(ln), Some(rn)) = (pqueue.extract_min(), pqueue.extract_min()) else {
                break;
            };
            pqueue.insert(Node::new_internal(ln, rn))?;
        }

        let root = pqueue.extract_min().ok_or(Error::EmptyAlphabet)?;
        tracing::debug!(
            "built tree over {} symbols, total weight {}",
            table.unique(),
            root.weight
        );
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Visits every node depth-first, parents before children.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some((left, right)) = node.children() {
                stack.push(right);
                stack.push(left);
            }
            Some(node)
        })
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes().filter(|n| n.symbol().is_some()).count()
    }
}
