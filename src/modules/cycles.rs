//! Import cycle detection (Kosaraju, iterative)

use crate::types::ModuleId;

/// Strongly connected groups of two or more modules in the import graph.
///
/// `edges[i]` lists the modules imported by the module at index `i`. Members
/// of each group are sorted by run order, and groups by their first member.
pub fn import_cycles(edges: &[Vec<ModuleId>]) -> Vec<Vec<ModuleId>> {
    let count = edges.len();

    // First pass: record nodes by DFS finish time.
    let mut visited = vec![false; count];
    let mut finished = Vec::with_capacity(count);
    for root in 0..count {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut stack = vec![(root, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (node, next_edge) = *frame;
            if let Some(target) = edges[node].get(next_edge) {
                frame.1 += 1;
                let target = target.index();
                if !visited[target] {
                    visited[target] = true;
                    stack.push((target, 0));
                }
            } else {
                finished.push(node);
                stack.pop();
            }
        }
    }

    let mut reversed = vec![Vec::new(); count];
    for (from, targets) in edges.iter().enumerate() {
        for target in targets {
            reversed[target.index()].push(from);
        }
    }

    // Second pass on the reversed graph, in reverse finish order.
    let mut assigned = vec![false; count];
    let mut groups = Vec::new();
    for &root in finished.iter().rev() {
        if assigned[root] {
            continue;
        }
        assigned[root] = true;
        let mut component = vec![root];
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            for &source in &reversed[node] {
                if !assigned[source] {
                    assigned[source] = true;
                    component.push(source);
                    stack.push(source);
                }
            }
        }

        if component.len() > 1 {
            component.sort_unstable();
            groups.push(component.into_iter().map(ModuleId::from_index).collect::<Vec<_>>());
        }
    }

    groups.sort_by_key(|group| group[0]);
    groups
}
