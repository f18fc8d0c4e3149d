use crate::{
    collaborator::{Branch, Collaborator, CollaboratorWithBranches},
    geo::Coordinates,
};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 3.0;
pub const MAX_SEARCH_RADIUS_KM: f64 = 50.0;

#[derive(Debug, Error, PartialEq)]
pub enum ProximityQueryError {
    #[error("Search radius must be greater than 0 and at most {} km, got: {0}", MAX_SEARCH_RADIUS_KM)]
    InvalidRadius(f64),
    #[error("Invalid coordinates, latitude: {lat}, longitude: {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// A validated proximity search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    pub origin: Coordinates,
    pub radius_km: f64,
}

impl ProximityQuery {
    pub fn new(lat: f64, lon: f64, radius_km: Option<f64>) -> Result<Self, ProximityQueryError> {
        let radius_km = radius_km.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);
        if !radius_km.is_finite() || radius_km <= 0.0 || radius_km > MAX_SEARCH_RADIUS_KM {
            return Err(ProximityQueryError::InvalidRadius(radius_km));
        }
        let origin = Coordinates::new(lon, lat)
            .ok_or(ProximityQueryError::InvalidCoordinates { lat, lon })?;

        Ok(Self { origin, radius_km })
    }
}

/// A `Collaborator` within the search radius, annotated with its
/// nearest `Branch`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCollaborator {
    pub collaborator: Collaborator,
    pub distance: f64,
    pub closest_branch: Branch,
    pub total_branches_with_location: usize,
}

/// Ranks the given collaborators by the distance from the query origin to
/// their nearest geocoded branch. Collaborators without any branch that has a
/// valid location are skipped and so are those whose nearest branch is
/// outside of the radius. The sort is stable, so equally distant
/// collaborators keep their input order.
pub fn rank_nearby(
    query: &ProximityQuery,
    collaborators: Vec<CollaboratorWithBranches>,
) -> Vec<RankedCollaborator> {
    let mut ranked = collaborators
        .into_iter()
        .filter_map(|c| nearest_branch(&query.origin, c))
        .filter(|c| c.distance <= query.radius_km)
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

fn nearest_branch(
    origin: &Coordinates,
    c: CollaboratorWithBranches,
) -> Option<RankedCollaborator> {
    let mut total_branches_with_location = 0;
    let mut closest: Option<(f64, Branch)> = None;

    for branch in c.branches {
        let location = match branch.coordinates() {
            Some(location) => location,
            None => continue,
        };
        total_branches_with_location += 1;

        let distance = origin.distance_km(&location);
        match &closest {
            Some((min, _)) if *min <= distance => {}
            _ => closest = Some((distance, branch)),
        }
    }

    closest.map(|(distance, closest_branch)| RankedCollaborator {
        collaborator: c.collaborator,
        distance,
        closest_branch,
        total_branches_with_location,
    })
}
