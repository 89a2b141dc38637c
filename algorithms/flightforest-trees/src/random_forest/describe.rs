//! Human readable rendering of a fitted forest
//!
//! ```text
//! RandomForestClassificationModel with 2 trees
//!   Tree 0 (weight 1.0):
//!     If (feature 6 <= 1.5)
//!      Predict: 0.0
//!     Else (feature 6 > 1.5)
//!      Predict: 1.0
//!   Tree 1 (weight 1.0):
//!     Predict: 0.0
//! ```
use std::fmt;

use linfa_trees::TreeNode;

use super::algorithm::RandomForestClassifier;
use super::binning::FeatureBins;

const TREE_INDENT: usize = 4;

impl fmt::Display for RandomForestClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RandomForestClassificationModel with {} trees", self.num_trees())?;
        for (i, (tree, features)) in self.trees().enumerate() {
            write!(f, "\n  Tree {} (weight 1.0):", i)?;
            write_node(f, tree.root_node(), features, self.bins(), TREE_INDENT)?;
        }

        Ok(())
    }
}

fn write_node(
    f: &mut fmt::Formatter<'_>,
    node: &TreeNode<f64, usize>,
    features: &[usize],
    bins: &FeatureBins,
    indent: usize,
) -> fmt::Result {
    let children = node.children();
    let (left, right) = match (node.is_leaf(), children[0], children[1]) {
        (false, Some(left), Some(right)) => (left, right),
        _ => {
            let prediction = node.prediction().unwrap_or_default();
            return write!(f, "\n{:indent$}Predict: {:?}", "", prediction as f64, indent = indent);
        }
    };

    let (idx, split, _) = node.split();
    let feature = features[idx];
    let threshold = bins.threshold(feature, split).unwrap_or(split);

    write!(
        f,
        "\n{:indent$}If (feature {} <= {:?})",
        "",
        feature,
        threshold,
        indent = indent
    )?;
    write_node(f, left, features, bins, indent + 1)?;
    write!(
        f,
        "\n{:indent$}Else (feature {} > {:?})",
        "",
        feature,
        threshold,
        indent = indent
    )?;
    write_node(f, right, features, bins, indent + 1)
}
