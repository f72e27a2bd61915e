use crate::board::Player;

/// The evaluation of a position for each player
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Score {
    pub player_one: f64,
    pub player_two: f64,
}

impl Score {
    pub fn new(player_one: f64, player_two: f64) -> Self {
        Self {
            player_one,
            player_two,
        }
    }

    pub fn for_player(&self, player: Player) -> f64 {
        match player {
            Player::One => self.player_one,
            Player::Two => self.player_two,
        }
    }
}

/// A position in the game tree, reached by playing `column` from its parent
///
/// Children are kept in ascending column order. The root has no column.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    score: Score,
    column: Option<usize>,
    children: Vec<Node>,
}

impl Node {
    pub fn root(score: Score) -> Self {
        Self {
            score,
            column: None,
            children: Vec::new(),
        }
    }

    pub fn new(score: Score, column: usize) -> Self {
        Self {
            score,
            column: Some(column),
            children: Vec::new(),
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn column(&self) -> Option<usize> {
        self.column
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends a child and returns a reference to it for further expansion
    pub fn add(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Total number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// The number of plies below this node on the longest path
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}
