use std::collections::{HashSet, VecDeque};

use model::{
    company::Company,
    station::{SearchArea, Station},
    WithDistance, WithId,
};
use utility::id::Id;

use crate::database::{CompanyRepo, Result};

/// Keeps the stations within the search area and orders them nearest first.
///
/// Stations with equal distance keep their relative input order.
pub fn within_radius<I>(
    stations: I,
    area: &SearchArea,
) -> Vec<WithDistance<WithId<Station>>>
where
    I: IntoIterator<Item = WithId<Station>>,
{
    let mut found = stations
        .into_iter()
        .map(|station| {
            let distance =
                station.content.distance_to(area.latitude, area.longitude);
            WithDistance::new(distance, station)
        })
        .filter(|station| station.distance_km <= area.radius_km)
        .collect::<Vec<_>>();
    found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    found
}

/// Collects the ids of `root` and all of its direct and indirect child
/// companies.
///
/// Walks the tree breadth first, asking the repo for one level of children
/// at a time. Companies already visited are never expanded again, so a cycle
/// in the stored parent relation terminates the walk instead of looping.
pub async fn company_subtree<R>(
    repo: &mut R,
    root: Id<Company>,
) -> Result<HashSet<Id<Company>>>
where
    R: CompanyRepo + Send + ?Sized,
{
    let mut visited = HashSet::from([root]);
    let mut worklist = VecDeque::from([root]);

    while !worklist.is_empty() {
        let level = worklist.drain(..).collect::<Vec<_>>();
        for child in repo.child_ids(&level).await? {
            if visited.insert(child) {
                worklist.push_back(child);
            }
        }
    }

    log::debug!("company {} owns {} companies", root, visited.len());
    Ok(visited)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use utility::id::IdWrapper;

    use super::*;
    use crate::database::{DatabaseError, Repo};

    fn station(id: i64, latitude: f64, longitude: f64) -> WithId<Station> {
        WithId::new(
            Id::new(id),
            Station::new(format!("Station {}", id), latitude, longitude, Id::new(1)),
        )
    }

    fn ids(found: &[WithDistance<WithId<Station>>]) -> Vec<i64> {
        found.iter().map(|station| station.content.id.raw()).collect()
    }

    #[test]
    fn finds_stations_near_origin() {
        let stations = vec![station(1, 10.0, 0.0), station(2, 1.0, 1.0), station(3, 1.0, 0.0)];
        let found = within_radius(stations, &SearchArea::new(0.0, 0.0, 200.0));
        assert_eq!(ids(&found), vec![3, 2]);
        assert!((found[0].distance_km - 111.195).abs() < 1e-3);
        assert!((found[1].distance_km - 157.25).abs() < 1e-1);
    }

    #[test]
    fn result_is_sorted_by_distance() {
        let stations = (0..50)
            .map(|i| station(i, ((i * 37) % 50) as f64 * 0.1, ((i * 11) % 50) as f64 * -0.1))
            .collect::<Vec<_>>();
        let area = SearchArea::new(1.0, -1.0, 400.0);
        let expected = stations
            .iter()
            .filter(|station| {
                station.content.distance_to(area.latitude, area.longitude) <= area.radius_km
            })
            .count();
        let found = within_radius(stations, &area);
        assert!(expected > 1 && expected < 50);
        assert_eq!(found.len(), expected);
        assert!(found
            .windows(2)
            .all(|pair| pair[0].distance_km <= pair[1].distance_km));
    }

    #[test]
    fn includes_exactly_the_stations_within_radius() {
        let area = SearchArea::new(54.3, 10.1, 30.0);
        let stations = (0..40)
            .map(|i| station(i, 54.0 + i as f64 * 0.02, 10.1))
            .collect::<Vec<_>>();
        let found = within_radius(stations.clone(), &area);
        for candidate in stations {
            let inside = candidate.content.distance_to(area.latitude, area.longitude)
                <= area.radius_km;
            let listed = found
                .iter()
                .any(|station| station.content.id == candidate.id);
            assert_eq!(inside, listed, "station {}", candidate.id);
        }
    }

    #[test]
    fn zero_radius_matches_only_same_point() {
        let stations = vec![station(1, 5.0, 5.0), station(2, 5.0, 5.000001), station(3, 5.0, 5.0)];
        let found = within_radius(stations, &SearchArea::new(5.0, 5.0, 0.0));
        assert_eq!(ids(&found), vec![1, 3]);
        assert!(found.iter().all(|station| station.distance_km == 0.0));
    }

    #[test]
    fn empty_when_nothing_is_near() {
        let found = within_radius(vec![station(1, 45.0, 45.0)], &SearchArea::new(0.0, 0.0, 10.0));
        assert!(found.is_empty());
        assert!(within_radius(vec![], &SearchArea::new(0.0, 0.0, 10.0)).is_empty());
    }

    /// Parent pointers only, enough to walk the tree.
    struct Tree {
        parents: HashMap<i64, i64>,
        lookups: usize,
    }

    impl Tree {
        fn new(edges: &[(i64, i64)]) -> Self {
            Self {
                parents: edges.iter().copied().collect(),
                lookups: 0,
            }
        }
    }

    #[async_trait]
    impl Repo<Company> for Tree {
        async fn get(&mut self, _id: Id<Company>) -> Result<WithId<Company>> {
            Err(DatabaseError::NotFound)
        }
        async fn get_all(&mut self) -> Result<Vec<WithId<Company>>> {
            Ok(vec![])
        }
        async fn insert(&mut self, _element: Company) -> Result<WithId<Company>> {
            Err(DatabaseError::NotFound)
        }
        async fn update(&mut self, _element: WithId<Company>) -> Result<WithId<Company>> {
            Err(DatabaseError::NotFound)
        }
        async fn delete(&mut self, _id: Id<Company>) -> Result<()> {
            Ok(())
        }
        async fn exists(&mut self, _id: Id<Company>) -> Result<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl CompanyRepo for Tree {
        async fn child_ids(&mut self, parents: &[Id<Company>]) -> Result<Vec<Id<Company>>> {
            self.lookups += 1;
            let parents = parents.raw();
            let mut children = self
                .parents
                .iter()
                .filter(|(_, parent)| parents.contains(*parent))
                .map(|(child, _)| Id::new(*child))
                .collect::<Vec<_>>();
            children.sort();
            Ok(children)
        }
    }

    async fn subtree(tree: &mut Tree, root: i64) -> Vec<i64> {
        let mut found = company_subtree(tree, Id::new(root))
            .await
            .unwrap()
            .into_iter()
            .map(|id| id.raw())
            .collect::<Vec<_>>();
        found.sort();
        found
    }

    #[tokio::test]
    async fn subtree_of_leaf_is_itself() {
        let mut tree = Tree::new(&[(2, 1)]);
        assert_eq!(subtree(&mut tree, 2).await, vec![2]);
    }

    #[tokio::test]
    async fn subtree_contains_all_descendants() {
        // 1 -> 2 -> 3 -> 4, 1 -> 5, 6 unrelated
        let mut tree = Tree::new(&[(2, 1), (3, 2), (4, 3), (5, 1), (7, 6)]);
        assert_eq!(subtree(&mut tree, 1).await, vec![1, 2, 3, 4, 5]);
        assert_eq!(subtree(&mut tree, 2).await, vec![2, 3, 4]);
        assert_eq!(subtree(&mut tree, 6).await, vec![6, 7]);
    }

    #[tokio::test]
    async fn subtree_asks_once_per_level() {
        let mut tree = Tree::new(&[(2, 1), (3, 1), (4, 2), (5, 3), (6, 4)]);
        assert_eq!(subtree(&mut tree, 1).await, vec![1, 2, 3, 4, 5, 6]);
        // levels {1}, {2, 3}, {4, 5} and the childless {6}
        assert_eq!(tree.lookups, 4);
    }

    #[tokio::test]
    async fn subtree_terminates_on_cycles() {
        // 1 -> 2 -> 3 -> 1
        let mut tree = Tree::new(&[(2, 1), (3, 2), (1, 3), (4, 3)]);
        assert_eq!(subtree(&mut tree, 2).await, vec![1, 2, 3, 4]);

        let mut tree = Tree::new(&[(1, 1)]);
        assert_eq!(subtree(&mut tree, 1).await, vec![1]);
    }
}
