//! Tree structure rendering for model hierarchies

use console::Style;
use humansize::{DECIMAL, format_size};

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub size: Option<u64>,
    pub children: Vec<TreeNode>,
    pub metadata: Vec<(String, String)>,
    pub external_refs: Vec<ExternalRef>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Root,
    Header,
    Joint,
    Mesh,
    Animation,
    #[allow(dead_code)]
    Property,
}

/// External file reference
#[derive(Debug, Clone)]
pub struct ExternalRef {
    pub path: String,
    pub ref_type: RefType,
}

/// Types of external references
#[derive(Debug, Clone, PartialEq)]
pub enum RefType {
    Texture,
    Model,
    Animation,
    Unknown,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
    pub compact: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            no_color: false,
            show_metadata: true,
            compact: false,
        }
    }
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: String, node_type: NodeType) -> Self {
        Self {
            name,
            node_type,
            size: None,
            children: Vec::new(),
            metadata: Vec::new(),
            external_refs: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set the size of this node
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add metadata, rendered in insertion order
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    /// Add external reference
    pub fn with_external_ref(mut self, path: &str, ref_type: RefType) -> Self {
        self.external_refs.push(ExternalRef {
            path: path.to_string(),
            ref_type,
        });
        self
    }
}

impl ExternalRef {
    /// Get emoji icon for reference type
    pub fn icon(&self) -> &'static str {
        match self.ref_type {
            RefType::Texture => "🖼️",
            RefType::Model => "🏗️",
            RefType::Animation => "📽️",
            RefType::Unknown => "📁",
        }
    }

    /// Get color style for references
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            Style::new().yellow()
        }
    }
}

impl NodeType {
    /// Get emoji icon for node type
    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Root => "📁",
            NodeType::Header => "📋",
            NodeType::Joint => "🦴",
            NodeType::Mesh => "🧩",
            NodeType::Animation => "🎞️",
            NodeType::Property => "🏷️",
        }
    }

    /// Get color style for node type
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Header => Style::new().bold().yellow(),
                NodeType::Joint => Style::new().green(),
                NodeType::Mesh => Style::new().blue(),
                NodeType::Animation => Style::new().magenta(),
                NodeType::Property => Style::new().dim(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

/// Render a single node and its children
fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let icon = node.node_type.icon();
    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!(
        "{}{}{} {}",
        prefix,
        connector,
        icon,
        style.apply_to(&node.name)
    );

    if let Some(size) = node.size {
        line.push_str(&format!(" ({})", format_size(size, DECIMAL)));
    }

    if options.show_metadata && options.compact && !node.metadata.is_empty() {
        let meta_parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        line.push_str(&format!(" [{}]", meta_parts.join(", ")));
    }

    output.push_str(&line);
    output.push('\n');

    let child_prefix = if depth == 0 {
        ""
    } else if is_last {
        "    "
    } else {
        "│   "
    };

    if options.show_metadata && !options.compact && !node.metadata.is_empty() {
        let meta_prefix = format!("{prefix}{child_prefix}    ");
        let meta_style = Style::new().dim();
        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{}🏷️  {}: {}\n",
                meta_prefix,
                meta_style.apply_to(key),
                value
            ));
        }
    }

    if !node.external_refs.is_empty() {
        let ref_prefix = format!("{prefix}{child_prefix}    ");
        for ext_ref in &node.external_refs {
            let icon = ext_ref.icon();
            let style = ext_ref.style(options.no_color);
            output.push_str(&format!(
                "{}└─→ {} {}\n",
                ref_prefix,
                icon,
                style.apply_to(&ext_ref.path)
            ));
        }
    }

    // Render children
    if !node.children.is_empty() {
        let new_prefix = if depth == 0 {
            String::new()
        } else {
            format!("{}{}", prefix, if is_last { "    " } else { "│   " })
        };

        for (i, child) in node.children.iter().enumerate() {
            let is_last_child = i == node.children.len() - 1;
            render_node(
                child,
                output,
                &new_prefix,
                is_last_child,
                depth + 1,
                options,
            );
        }
    }
}

/// Detect reference type from file extension
pub fn detect_ref_type(path: &str) -> RefType {
    let path_lower = path.to_lowercase();

    if path_lower.ends_with(".tga") || path_lower.ends_with(".dds") || path_lower.ends_with(".png")
    {
        RefType::Texture
    } else if path_lower.ends_with("md5mesh") {
        RefType::Model
    } else if path_lower.ends_with("md5anim") {
        RefType::Animation
    } else {
        RefType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_joint_hierarchies() {
        let root = TreeNode::new("imp".to_string(), NodeType::Root)
            .with_size(1024)
            .with_metadata("version", "10")
            .add_child(
                TreeNode::new("Skeleton".to_string(), NodeType::Header).add_child(
                    TreeNode::new("origin".to_string(), NodeType::Joint)
                        .add_child(TreeNode::new("spine".to_string(), NodeType::Joint)),
                ),
            )
            .add_child(
                TreeNode::new("mesh 0".to_string(), NodeType::Mesh)
                    .with_external_ref("models/imp/imp.tga", RefType::Texture),
            );

        let options = TreeOptions {
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&root, &options);

        assert!(output.contains("imp"));
        assert!(output.contains("└── 🦴 spine"));
        assert!(output.contains("models/imp/imp.tga"));
        assert!(output.contains("version"));
    }

    #[test]
    fn depth_limit_prunes_children() {
        let root = TreeNode::new("top".to_string(), NodeType::Root).add_child(
            TreeNode::new("middle".to_string(), NodeType::Joint)
                .add_child(TreeNode::new("bottom".to_string(), NodeType::Joint)),
        );
        let options = TreeOptions {
            max_depth: Some(1),
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&root, &options);
        assert!(output.contains("middle"));
        assert!(!output.contains("bottom"));
    }

    #[test]
    fn reference_types_follow_extensions() {
        assert_eq!(detect_ref_type("models/imp/imp.tga"), RefType::Texture);
        assert_eq!(detect_ref_type("models/imp/imp.md5mesh"), RefType::Model);
        assert_eq!(detect_ref_type("models/imp/walk1.md5anim"), RefType::Animation);
        assert_eq!(detect_ref_type("sound/imp/sight.wav"), RefType::Unknown);
    }
}
