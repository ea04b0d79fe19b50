//! Query AST nodes and evaluation against document text.

use std::fmt;

use memchr::memmem::Finder;

/// A document text folded to lowercase once, so every term matcher of every
/// query scans the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedText(String);

impl FoldedText {
    pub fn new(text: &str) -> Self {
        Self(text.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Boolean operator joining the children of an [`OpNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A parsed query expression (AST node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    Term(TermNode),
    Op(OpNode),
}

impl QueryNode {
    /// Evaluates the tree against text that was already folded.
    pub fn evaluate(&self, text: &FoldedText) -> bool {
        match self {
            Self::Term(term) => term.evaluate(text),
            Self::Op(op) => op.evaluate(text),
        }
    }

    /// Folds `text` and evaluates the tree against it.
    pub fn matches(&self, text: &str) -> bool {
        self.evaluate(&FoldedText::new(text))
    }

    /// Number of term leaves in the tree.
    pub fn term_count(&self) -> usize {
        match self {
            Self::Term(_) => 1,
            Self::Op(op) => op.children.iter().map(Self::term_count).sum(),
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(term) => write!(f, "\"{}\"", term.phrase),
            Self::Op(op) => {
                write!(f, "({}", op.operator.as_str())?;
                for child in &op.children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Leaf phrase matched as a case-insensitive substring.
#[derive(Clone)]
pub struct TermNode {
    phrase: String,
    finder: Finder<'static>,
}

impl TermNode {
    pub fn new(phrase: &str) -> Self {
        let folded = phrase.to_lowercase();
        let finder = Finder::new(folded.as_bytes()).into_owned();
        Self {
            phrase: phrase.to_string(),
            finder,
        }
    }

    /// The phrase as written in the query.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn evaluate(&self, text: &FoldedText) -> bool {
        self.finder.find(text.as_str().as_bytes()).is_some()
    }
}

impl fmt::Debug for TermNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermNode")
            .field("phrase", &self.phrase)
            .finish()
    }
}

impl PartialEq for TermNode {
    fn eq(&self, other: &Self) -> bool {
        self.phrase == other.phrase
    }
}

impl Eq for TermNode {}

/// Operator node owning an ordered, non-empty list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpNode {
    operator: Operator,
    children: Vec<QueryNode>,
}

impl OpNode {
    /// Builds an operator node. Returns `None` for an empty child list, which
    /// the grammar never produces.
    pub fn new(operator: Operator, children: Vec<QueryNode>) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        Some(Self { operator, children })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn children(&self) -> &[QueryNode] {
        &self.children
    }

    pub fn into_children(self) -> Vec<QueryNode> {
        self.children
    }

    pub fn evaluate(&self, text: &FoldedText) -> bool {
        match self.operator {
            Operator::And => self.children.iter().all(|child| child.evaluate(text)),
            Operator::Or => self.children.iter().any(|child| child.evaluate(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(phrase: &str) -> QueryNode {
        QueryNode::Term(TermNode::new(phrase))
    }

    fn op(operator: Operator, children: Vec<QueryNode>) -> QueryNode {
        QueryNode::Op(OpNode::new(operator, children).expect("non-empty"))
    }

    #[test]
    fn term_matches_case_insensitive_substring() {
        let node = term("Neural Codec");
        assert!(node.matches("a NEURAL CODEC for images"));
        assert!(node.matches("neural codecs"));
        assert!(!node.matches("neural video codec"));
    }

    #[test]
    fn term_matches_agree_with_lowercase_contains() {
        let texts = ["Deep Learning", "deep-learning", "DEEPLY", "", "über Größe"];
        let phrases = ["deep", "LEARN", "y", "größe", "ÜBER", "-"];
        for phrase in phrases {
            let node = term(phrase);
            for text in texts {
                assert_eq!(
                    node.matches(text),
                    text.to_lowercase().contains(&phrase.to_lowercase()),
                    "phrase={phrase} text={text}"
                );
            }
        }
    }

    #[test]
    fn and_requires_every_child() {
        let node = op(Operator::And, vec![term("a"), term("b"), term("c")]);
        assert!(node.matches("c b a"));
        assert!(!node.matches("a b"));
    }

    #[test]
    fn or_requires_any_child() {
        let node = op(Operator::Or, vec![term("x"), term("y")]);
        assert!(node.matches("only y"));
        assert!(!node.matches("neither"));
    }

    #[test]
    fn single_child_operators_defer_to_the_child() {
        for operator in [Operator::And, Operator::Or] {
            let node = op(operator, vec![term("fpga")]);
            assert!(node.matches("FPGA board"));
            assert!(!node.matches("gpu board"));
        }
    }

    #[test]
    fn empty_operator_is_rejected() {
        assert!(OpNode::new(Operator::And, Vec::new()).is_none());
    }

    #[test]
    fn display_renders_prefix_form() {
        let node = op(
            Operator::Or,
            vec![term("a"), op(Operator::And, vec![term("b"), term("c")])],
        );
        assert_eq!(node.to_string(), "(OR \"a\" (AND \"b\" \"c\"))");
        assert_eq!(node.term_count(), 3);
    }

    #[test]
    fn evaluate_reuses_folded_text() {
        let folded = FoldedText::new("Deep Learning for Image Compression");
        assert_eq!(folded.as_str(), "deep learning for image compression");
        assert!(term("IMAGE").evaluate(&folded));
        assert!(!term("video").evaluate(&folded));
    }
}
