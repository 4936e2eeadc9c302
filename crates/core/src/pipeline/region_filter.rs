use crate::shared::region::Region;

/// Prepares raw detections for compositing.
///
/// Zero-area boxes are dropped. When `dedup_iou` is Some, overlapping
/// detections are reduced greedily in detector order; otherwise every
/// detection is kept and later ones composite over earlier ones.
pub fn filter_regions(regions: &[Region], dedup_iou: Option<f64>) -> Vec<Region> {
    let non_empty: Vec<Region> = regions.iter().filter(|r| !r.is_empty()).copied().collect();
    match dedup_iou {
        Some(threshold) => Region::deduplicate(&non_empty, threshold),
        None => non_empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dedup_returns_all() {
        let regions = vec![Region::new(10, 10, 50, 50), Region::new(12, 12, 50, 50)];
        let result = filter_regions(&regions, None);
        assert_eq!(result, regions);
    }

    #[test]
    fn test_dedup_keeps_first_of_overlapping_pair() {
        let regions = vec![
            Region::new(10, 10, 50, 50),
            Region::new(12, 12, 50, 50),
            Region::new(200, 200, 40, 40),
        ];
        let result = filter_regions(&regions, Some(0.5));
        assert_eq!(
            result,
            vec![Region::new(10, 10, 50, 50), Region::new(200, 200, 40, 40)]
        );
    }

    #[test]
    fn test_empty_regions_dropped() {
        let regions = vec![
            Region::new(0, 0, 0, 10),
            Region::new(5, 5, 10, 10),
            Region::new(0, 0, 10, -1),
        ];
        assert_eq!(filter_regions(&regions, None), vec![Region::new(5, 5, 10, 10)]);
    }

    #[test]
    fn test_detector_order_preserved() {
        let regions = vec![Region::new(100, 0, 10, 10), Region::new(0, 0, 10, 10)];
        assert_eq!(filter_regions(&regions, Some(0.3)), regions);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_regions(&[], Some(0.5)).is_empty());
    }
}
