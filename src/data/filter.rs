use super::model::{AirQualityDataset, Observation};

// ---------------------------------------------------------------------------
// Station filter
// ---------------------------------------------------------------------------

/// Return indices of observations recorded at `station`, in file order.
///
/// An unknown station is not an error: it simply matches nothing, and every
/// later stage copes with the empty result.
pub fn station_indices(dataset: &AirQualityDataset, station: &str) -> Vec<usize> {
    dataset
        .observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| obs.station == station)
        .map(|(i, _)| i)
        .collect()
}

/// Resolve indices from [`station_indices`] back into rows.
pub fn rows<'a>(dataset: &'a AirQualityDataset, indices: &[usize]) -> Vec<&'a Observation> {
    indices
        .iter()
        .filter_map(|&i| dataset.observations.get(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STATIONS;
    use crate::data::fixtures::{mixed_dataset, station_rows};

    #[test]
    fn returns_only_matching_station() {
        let ds = mixed_dataset();
        for station in STATIONS {
            let rows = station_rows(&ds, station);
            assert!(!rows.is_empty(), "{station} should have rows");
            assert!(rows.iter().all(|o| o.station == station));
        }
    }

    #[test]
    fn station_subsets_partition_the_dataset() {
        let ds = mixed_dataset();
        let mut all: Vec<usize> = STATIONS
            .iter()
            .flat_map(|s| station_indices(&ds, s))
            .collect();
        let unrecognized = ds
            .observations
            .iter()
            .enumerate()
            .filter(|(_, o)| !STATIONS.contains(&o.station.as_str()))
            .map(|(i, _)| i);
        all.extend(unrecognized);
        all.sort_unstable();

        assert_eq!(all, (0..ds.len()).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_station_yields_empty_subset() {
        let ds = mixed_dataset();
        assert!(station_indices(&ds, "Atlantis").is_empty());
        assert!(station_rows(&ds, "").is_empty());
    }

    #[test]
    fn indices_preserve_file_order() {
        let ds = mixed_dataset();
        let idx = station_indices(&ds, "Guanyuan");
        assert_eq!(idx, vec![0, 1, 3, 5]);
    }
}
