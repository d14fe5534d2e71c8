/// The index of a node in the trie.
pub type TrieIndex = usize;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct TrieNode {
    /// The children in insertion order.
    children: Vec<(String, TrieIndex)>,
    word_end: bool,
}

/// A prefix tree over words of symbols, stored as an arena of nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordTrie {
    nodes: Vec<TrieNode>,
}

impl Default for WordTrie {
    fn default() -> Self {
        WordTrie::new()
    }
}

impl WordTrie {
    /// Creates a trie with only the root node.
    pub fn new() -> WordTrie {
        WordTrie {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Creates a trie containing all the given words.
    pub fn from_words<I, W>(words: I) -> WordTrie
    where
        I: IntoIterator<Item = W>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let mut trie = WordTrie::new();
        for word in words {
            trie.insert(word);
        }
        trie
    }

    /// Inserts the word, does nothing for the empty word.
    pub fn insert<W>(&mut self, word: W)
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let mut current = self.root();
        let mut length = 0;

        for symbol in word {
            current = match self.child(current, symbol.as_ref()) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.push((symbol.as_ref().to_string(), child));
                    child
                }
            };
            length += 1;
        }

        if length > 0 {
            self.nodes[current].word_end = true;
        }
    }

    /// Returns true iff the given word was inserted.
    pub fn contains<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let mut current = self.root();
        let mut length = 0;

        for symbol in word {
            match self.child(current, symbol.as_ref()) {
                Some(child) => current = child,
                None => return false,
            }
            length += 1;
        }

        length > 0 && self.nodes[current].word_end
    }

    /// Returns the root node.
    pub fn root(&self) -> TrieIndex {
        0
    }

    /// Returns the labelled children of the given node, in insertion order.
    pub fn children(&self, node: TrieIndex) -> &[(String, TrieIndex)] {
        &self.nodes[node].children
    }

    /// Returns true iff a word ends at the given node.
    pub fn is_word_end(&self, node: TrieIndex) -> bool {
        self.nodes[node].word_end
    }

    pub fn has_children(&self, node: TrieIndex) -> bool {
        !self.nodes[node].children.is_empty()
    }

    /// Returns the number of nodes, including the root.
    pub fn num_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn child(&self, node: TrieIndex, symbol: &str) -> Option<TrieIndex> {
        self.nodes[node]
            .children
            .iter()
            .find(|(label, _)| label == symbol)
            .map(|(_, child)| *child)
    }
}
