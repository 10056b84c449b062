use indexmap::map::Entry;
use indexmap::IndexMap;
use pathfinding::num_traits::Zero;
use rustc_hash::{FxHashSet, FxHasher};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::{BuildHasherDefault, Hash};
use std::ops::Add;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Sentinel parent index of the starting node.
const NO_PARENT: usize = usize::MAX;

#[derive(Debug)]
struct SmallestHolder<C> {
    cost: C,
    index: usize,
}

impl<C: Ord> PartialEq for SmallestHolder<C> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.index == other.index
    }
}

impl<C: Ord> Eq for SmallestHolder<C> {}

impl<C: Ord> PartialOrd for SmallestHolder<C> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for SmallestHolder<C> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed, so the heap yields the cheapest entry first. Equal
        // costs yield the earliest discovered entry first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Iterator returned by [`Dijkstra::reach`].
pub struct DijkstraReachable<N, C, FN> {
    to_see: BinaryHeap<SmallestHolder<C>>,
    seen: FxHashSet<usize>,
    parents: FxIndexMap<N, (usize, C)>,
    successors: FN,
}

/// Information about a node reached by [`Dijkstra::reach`].
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct DijkstraReachableItem<N, C> {
    /// The node that was reached.
    pub node: N,
    /// Position of the node within the search arena, see [`DijkstraReachable::path`].
    pub index: usize,
    /// The total cost from the starting node.
    pub total_cost: C,
}

impl<N, C, FN, IN> Iterator for DijkstraReachable<N, C, FN>
where
    N: Eq + Hash + Clone,
    C: Ord + Copy + Add<Output = C>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
{
    type Item = DijkstraReachableItem<N, C>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(SmallestHolder { cost, index }) = self.to_see.pop() {
            if !self.seen.insert(index) {
                continue;
            }

            let Some((node, _)) = self.parents.get_index(index) else {
                continue;
            };

            let item = DijkstraReachableItem {
                node: node.clone(),
                index,
                total_cost: cost,
            };

            for (successor, move_cost) in (self.successors)(&item.node) {
                let new_cost = cost + move_cost;

                let successor_index = match self.parents.entry(successor) {
                    Entry::Vacant(e) => {
                        let n = e.index();
                        e.insert((index, new_cost));
                        n
                    }
                    Entry::Occupied(mut e) => {
                        if e.get().1 > new_cost && !self.seen.contains(&e.index()) {
                            e.insert((index, new_cost));
                            e.index()
                        } else {
                            continue;
                        }
                    }
                };

                self.to_see.push(SmallestHolder {
                    cost: new_cost,
                    index: successor_index,
                });
            }

            return Some(item);
        }

        None
    }
}

impl<N, C, FN> DijkstraReachable<N, C, FN>
where
    N: Eq + Hash + Clone,
{
    /// The nodes from the start to the reached node at `index`, inclusive.
    pub fn path(&self, index: usize) -> Vec<N> {
        let mut path = Vec::new();
        let mut current = index;

        while let Some((node, (parent, _))) = self.parents.get_index(current) {
            path.push(node.clone());
            if *parent == NO_PARENT {
                break;
            }
            current = *parent;
        }

        path.reverse();
        path
    }
}

pub struct Dijkstra;

impl Dijkstra {
    /// Visit all nodes that are reachable from a start node. The node
    /// will be visited in order of cost, with the closest nodes first.
    ///
    /// The `successors` function receives the current node, and returns
    /// an iterator of successors associated with their move cost.
    pub fn reach<N, C, FN, IN>(&self, start: &N, successors: FN) -> DijkstraReachable<N, C, FN>
    where
        N: Eq + Hash + Clone,
        C: Ord + Copy + Zero,
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
    {
        let mut to_see: BinaryHeap<SmallestHolder<C>> = BinaryHeap::with_capacity(256);
        to_see.push(SmallestHolder {
            cost: Zero::zero(),
            index: 0,
        });

        let mut parents: FxIndexMap<N, (usize, C)> =
            FxIndexMap::with_capacity_and_hasher(64, BuildHasherDefault::<FxHasher>::default());

        parents.insert(start.clone(), (NO_PARENT, Zero::zero()));
        let seen = FxHashSet::default();

        DijkstraReachable {
            to_see,
            seen,
            parents,
            successors,
        }
    }
}
