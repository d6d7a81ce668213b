//! The AST arena.
//!
//! Blocks and their parent nodes link through an arena rather than raw
//! pointers: nodes and blocks live in monotonically-growing vectors, and
//! parent links are
//! indices (`NodeId`, `BlockId`) into those vectors. The arena is the sole
//! owner; every traversal method below takes `&Ast` and returns indices,
//! never references that would create lifetime entanglement with the
//! token vector the sub-sequences point into.

use super::types::Datatype;
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

/// A detached token sub-sequence, represented as a half-open index range
/// into the single token vector owned by the arena, rather than a spliced
/// and restored linked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        TokenRange { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfKind {
    Reg,
    Elif,
    Else,
}

/// `{ parent_node, children, locals }`.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub parent_node: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub locals: Vec<super::types::Decl>,
}

/// A function definition's signature and body, embedded in
/// [`AstNode::Function`].
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    pub args: Vec<super::types::Decl>,
    pub return_type: Datatype,
    pub is_foreign: bool,
    pub is_variadic: bool,
    pub nargs: u32,
    pub reserve_slots: u32,
    /// `None` for `cfunc` declarations.
    pub block: Option<BlockId>,
}

/// The tagged union over AST node kinds.
#[derive(Debug, Clone)]
pub enum AstNode {
    Root {
        block: BlockId,
    },
    If {
        kind: IfKind,
        condition: Option<TokenRange>,
        block: BlockId,
        parent_block: BlockId,
        line: usize,
    },
    While {
        condition: TokenRange,
        block: BlockId,
        parent_block: BlockId,
        line: usize,
    },
    For {
        init: NodeId,
        condition: TokenRange,
        post: NodeId,
        block: BlockId,
        parent_block: BlockId,
        line: usize,
    },
    Function {
        info: FunctionInfo,
        parent_block: BlockId,
        line: usize,
    },
    Assign {
        lhs: TokenRange,
        rhs: TokenRange,
        parent_block: BlockId,
        line: usize,
    },
    Statement {
        expr: TokenRange,
        parent_block: BlockId,
        line: usize,
    },
    Return {
        expr: Option<TokenRange>,
        parent_block: BlockId,
        line: usize,
    },
    Continue {
        parent_block: BlockId,
        line: usize,
    },
    Break {
        parent_block: BlockId,
        line: usize,
    },
}

impl AstNode {
    pub fn parent_block(&self) -> Option<BlockId> {
        match self {
            AstNode::Root { .. } => None,
            AstNode::If { parent_block, .. }
            | AstNode::While { parent_block, .. }
            | AstNode::For { parent_block, .. }
            | AstNode::Function { parent_block, .. }
            | AstNode::Assign { parent_block, .. }
            | AstNode::Statement { parent_block, .. }
            | AstNode::Return { parent_block, .. }
            | AstNode::Continue { parent_block, .. }
            | AstNode::Break { parent_block, .. } => Some(*parent_block),
        }
    }

    pub fn own_block(&self) -> Option<BlockId> {
        match self {
            AstNode::Root { block }
            | AstNode::If { block, .. }
            | AstNode::While { block, .. }
            | AstNode::For { block, .. } => Some(*block),
            AstNode::Function { info, .. } => info.block,
            _ => None,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            AstNode::Root { .. } => 0,
            AstNode::If { line, .. }
            | AstNode::While { line, .. }
            | AstNode::For { line, .. }
            | AstNode::Function { line, .. }
            | AstNode::Assign { line, .. }
            | AstNode::Statement { line, .. }
            | AstNode::Return { line, .. }
            | AstNode::Continue { line, .. }
            | AstNode::Break { line, .. } => *line,
        }
    }
}

/// The arena owning every node, block, and the token vector sub-sequences
/// index into.
#[derive(Debug)]
pub struct Ast {
    pub tokens: Vec<Token>,
    nodes: Vec<AstNode>,
    blocks: Vec<Block>,
    pub root: NodeId,
}

impl Ast {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut ast = Ast {
            tokens,
            nodes: Vec::new(),
            blocks: Vec::new(),
            root: NodeId(0),
        };
        let root_block = ast.push_block(Block::default());
        let root = ast.push_node(AstNode::Root { block: root_block });
        ast.blocks[root_block.0 as usize].parent_node = Some(root);
        ast.root = root;
        ast
    }

    pub fn push_node(&mut self, node: AstNode) -> NodeId {
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }

    pub fn push_block(&mut self, block: Block) -> BlockId {
        self.blocks.push(block);
        BlockId((self.blocks.len() - 1) as u32)
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.0 as usize]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0 as usize]
    }

    pub fn append_child(&mut self, block: BlockId, node: NodeId) {
        self.blocks[block.0 as usize].children.push(node);
    }

    pub fn token_range(&self, range: TokenRange) -> &[Token] {
        &self.tokens[range.start..range.end]
    }
}
