use crate::geometry::{Bounds, Shape};
use crate::list::List;
use crate::QuadtreeVisitor;

/// Link in a leaf's singly linked list of elements.
#[derive(Copy, Clone, Debug)]
struct ElementNode {
    next: usize,
    element: usize,
}

impl Default for ElementNode {
    fn default() -> Self {
        Self {
            next: Quadtree::EMPTY,
            element: 0,
        }
    }
}

/// Geometry slot; erased slots are not `live`.
#[derive(Copy, Clone, Debug, Default)]
struct Element {
    shape: Shape,
    live: bool,
}

/// A leaf points at its first element link, a branch at its first of four
/// contiguous children.
#[derive(Copy, Clone, Debug)]
struct Node {
    first_child: usize,
    num_elements: i32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            first_child: Quadtree::EMPTY,
            num_elements: 0,
        }
    }
}

impl Node {
    fn is_branch(&self) -> bool {
        self.num_elements == Quadtree::BRANCH_FLAG
    }
}

/// Node index plus the region it covers, computed during descent.
#[derive(Copy, Clone, Debug, Default)]
struct NodeData {
    idx: usize,
    depth: u8,
    x: f64,
    y: f64,
    hx: f64,
    hy: f64,
}

impl NodeData {
    fn region(&self) -> Bounds {
        Bounds::from_center(self.x, self.y, self.hx, self.hy)
    }

    /// Child `quadrant` (0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right).
    fn child(&self, first_child: usize, quadrant: usize) -> NodeData {
        let qx = self.hx * 0.5;
        let qy = self.hy * 0.5;
        let x = if quadrant & 1 == 0 { self.x - qx } else { self.x + qx };
        let y = if quadrant & 2 == 0 { self.y - qy } else { self.y + qy };
        NodeData {
            idx: first_child + quadrant,
            depth: self.depth + 1,
            x,
            y,
            hx: qx,
            hy: qy,
        }
    }
}

/// Region quadtree over element bounding boxes.
///
/// An element is linked into every leaf its bounds touch. The split lines
/// belong to the top-left side: a leaf covers `(x0, x1] x (y0, y1]`, and the
/// outer leaves extend without limit, so elements outside the root region
/// are still indexed and found. Removing elements never merges leaves back.
pub struct Quadtree {
    root: NodeData,
    capacity: usize,
    max_depth: u8,
    element_nodes: List<ElementNode>,
    elements: List<Element>,
    nodes: List<Node>,
    len: usize,
}

impl Quadtree {
    const EMPTY: usize = usize::MAX;
    const BRANCH_FLAG: i32 = -1;

    pub fn new(region: Bounds, capacity: usize, max_depth: u8) -> Self {
        let mut nodes = List::new();
        let root_idx = nodes.push(Node::default());
        let (x, y) = region.center();
        Self {
            root: NodeData {
                idx: root_idx,
                depth: 0,
                x,
                y,
                hx: region.width() * 0.5,
                hy: region.height() * 0.5,
            },
            capacity: capacity.max(1),
            max_depth,
            nodes,
            element_nodes: List::new(),
            elements: List::new(),
            len: 0,
        }
    }

    /// Changes the split limits. Existing nodes stay as they are.
    pub fn set_limits(&mut self, capacity: usize, max_depth: u8) {
        self.capacity = capacity.max(1);
        self.max_depth = max_depth;
    }

    pub fn region(&self) -> Bounds {
        self.root.region()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nodes allocated, branches included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, element: usize) -> bool {
        element < self.elements.len() && self.elements.get(element).live
    }

    pub fn get(&self, element: usize) -> Option<&Shape> {
        self.contains(element).then(|| &self.elements.get(element).shape)
    }

    pub fn insert(&mut self, shape: Shape) -> usize {
        let element = self.elements.insert(Element { shape, live: true });
        self.node_insert(self.root, element);
        self.len += 1;
        element
    }

    /// Returns `false` if `element` is not in the tree.
    pub fn remove(&mut self, element: usize) -> bool {
        if !self.contains(element) {
            return false;
        }
        self.unlink(element);
        self.elements.erase(element);
        self.len -= 1;
        true
    }

    /// Moves an element to new geometry, keeping its index. Returns `false`
    /// if `element` is not in the tree.
    pub fn update(&mut self, element: usize, shape: Shape) -> bool {
        if !self.contains(element) {
            return false;
        }
        self.unlink(element);
        self.elements.get_mut(element).shape = shape;
        self.node_insert(self.root, element);
        true
    }

    /// Elements whose bounds touch `area` and that pass `accept`, each once,
    /// in index order.
    pub fn query<F>(&self, area: &Bounds, omit: Option<usize>, mut accept: F) -> Vec<usize>
        where
            F: FnMut(&Shape) -> bool,
    {
        let candidates = self.candidates(area, omit);
        let checked = candidates.len();
        let out: Vec<usize> = candidates
            .into_iter()
            .filter(|&element| {
                let shape = &self.elements.get(element).shape;
                area.intersects(&shape.bounds()) && accept(shape)
            })
            .collect();
        log::trace!("quadtree query checked {} candidates, {} hits", checked, out.len());
        out
    }

    /// Distinct elements linked into the leaves `area` touches. Costs the
    /// links walked, not the number of elements in the tree.
    fn candidates(&self, area: &Bounds, omit: Option<usize>) -> Vec<usize> {
        let mut candidates = Vec::new();
        let mut leaves = self.find_leaves(self.root, area);
        while let Some(nd_data) = leaves.pop() {
            let mut enode_idx = self.nodes.get(nd_data.idx).first_child;
            while enode_idx != Self::EMPTY {
                let enode = self.element_nodes.get(enode_idx);
                if omit != Some(enode.element) {
                    candidates.push(enode.element);
                }
                enode_idx = enode.next;
            }
        }
        // Straddling elements sit in several leaves.
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    /// Walks the tree depth first, reporting branches, leaves and the
    /// elements linked into each leaf. `label` names an element.
    pub fn traverse<'a, V, L>(&self, visitor: &mut V, label: L)
        where
            V: QuadtreeVisitor,
            L: Fn(usize) -> &'a str,
    {
        let mut to_process = List::<NodeData>::new();
        to_process.push(self.root);

        while let Some(nd_data) = to_process.pop() {
            let node = *self.nodes.get(nd_data.idx);
            if node.is_branch() {
                for quadrant in 0..4 {
                    to_process.push(nd_data.child(node.first_child, quadrant));
                }
                visitor.branch(nd_data.depth, &nd_data.region());
            } else {
                visitor.leaf(nd_data.depth, &nd_data.region());
                let mut enode_idx = node.first_child;
                while enode_idx != Self::EMPTY {
                    let enode = self.element_nodes.get(enode_idx);
                    visitor.object(label(enode.element), &self.elements.get(enode.element).shape);
                    enode_idx = enode.next;
                }
            }
        }
    }

    fn unlink(&mut self, element: usize) {
        let bounds = self.elements.get(element).shape.bounds();
        let mut leaves = self.find_leaves(self.root, &bounds);

        while let Some(nd_data) = leaves.pop() {
            // Walk the list until we find the element node.
            let mut enode_idx = self.nodes.get(nd_data.idx).first_child;
            let mut prev_idx = Self::EMPTY;
            while enode_idx != Self::EMPTY && self.element_nodes.get(enode_idx).element != element {
                prev_idx = enode_idx;
                enode_idx = self.element_nodes.get(enode_idx).next;
            }

            if enode_idx != Self::EMPTY {
                let next_idx = self.element_nodes.get(enode_idx).next;
                if prev_idx == Self::EMPTY {
                    self.nodes.get_mut(nd_data.idx).first_child = next_idx;
                } else {
                    self.element_nodes.get_mut(prev_idx).next = next_idx;
                }
                self.element_nodes.erase(enode_idx);
                self.nodes.get_mut(nd_data.idx).num_elements -= 1;
            }
        }
    }

    fn find_leaves(&self, start_node: NodeData, area: &Bounds) -> List<NodeData> {
        let mut leaves = List::<NodeData>::new();
        let mut to_process = List::<NodeData>::new();
        to_process.push(start_node);

        while let Some(nd_data) = to_process.pop() {
            let node = self.nodes.get(nd_data.idx);
            if !node.is_branch() {
                leaves.push(nd_data);
                continue;
            }
            let fc = node.first_child;
            let west = area.left <= nd_data.x;
            let east = area.right > nd_data.x;
            if area.top <= nd_data.y {
                if west {
                    to_process.push(nd_data.child(fc, 0));
                }
                if east {
                    to_process.push(nd_data.child(fc, 1));
                }
            }
            if area.bottom > nd_data.y {
                if west {
                    to_process.push(nd_data.child(fc, 2));
                }
                if east {
                    to_process.push(nd_data.child(fc, 3));
                }
            }
        }
        leaves
    }

    fn node_insert(&mut self, start_node: NodeData, element: usize) {
        let bounds = self.elements.get(element).shape.bounds();
        let mut leaves = self.find_leaves(start_node, &bounds);
        while let Some(nd_data) = leaves.pop() {
            self.leaf_insert(nd_data, element);
        }
    }

    fn leaf_insert(&mut self, nd_data: NodeData, element: usize) {
        let first_child = self.nodes.get(nd_data.idx).first_child;
        let enode = self.element_nodes.insert(ElementNode {
            element,
            next: first_child,
        });
        self.nodes.get_mut(nd_data.idx).first_child = enode;
        self.nodes.get_mut(nd_data.idx).num_elements += 1;

        let full = self.nodes.get(nd_data.idx).num_elements as usize > self.capacity;
        if full && nd_data.depth < self.max_depth && self.separable(nd_data) {
            self.split(nd_data);
        }
    }

    /// A split only helps if some element stays out of at least one child.
    /// Elements covering the leaf centre on both axes land in all four.
    fn separable(&self, nd_data: NodeData) -> bool {
        let mut enode_idx = self.nodes.get(nd_data.idx).first_child;
        while enode_idx != Self::EMPTY {
            let enode = self.element_nodes.get(enode_idx);
            let b = self.elements.get(enode.element).shape.bounds();
            let spans_x = b.left <= nd_data.x && b.right > nd_data.x;
            let spans_y = b.top <= nd_data.y && b.bottom > nd_data.y;
            if !(spans_x && spans_y) {
                return true;
            }
            enode_idx = enode.next;
        }
        false
    }

    fn split(&mut self, nd_data: NodeData) {
        // Transfer elements from the leaf to a list of elements.
        let mut elements = List::<usize>::new();
        while self.nodes.get(nd_data.idx).first_child != Self::EMPTY {
            let idx = self.nodes.get(nd_data.idx).first_child;
            let enode = *self.element_nodes.get(idx);
            self.nodes.get_mut(nd_data.idx).first_child = enode.next;
            self.element_nodes.erase(idx);
            elements.push(enode.element);
        }

        // Nodes are never erased, so pushing keeps the four children contiguous.
        let fc = self.nodes.push(Node::default());
        self.nodes.push(Node::default());
        self.nodes.push(Node::default());
        self.nodes.push(Node::default());

        let node = self.nodes.get_mut(nd_data.idx);
        node.first_child = fc;
        node.num_elements = Self::BRANCH_FLAG;
        log::trace!(
            "split node {} at depth {} into {}..{}",
            nd_data.idx,
            nd_data.depth,
            fc,
            fc + 3
        );

        while let Some(element) = elements.pop() {
            self.node_insert(nd_data, element);
        }
    }
}
