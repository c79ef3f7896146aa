//! Stratified page sampling for vitals measurement
//!
//! Measuring vitals is expensive, so only a sample of the crawled pages is
//! measured. The homepage and every depth-1 page are always part of the
//! sample; the rest is a uniform random fill up to the requested rate.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Selects the pages to measure
///
/// Always includes `homepage` (when it is one of `pages`) and every page whose
/// recorded depth is exactly 1. The target size is
/// `max(mandatory, floor(pages.len() * rate))`; if the mandatory pages fall
/// short of it, the remainder is drawn uniformly at random without
/// replacement from the other pages.
///
/// # Example
///
/// ```
/// use site_health::crawler::select_sample;
/// use std::collections::HashMap;
/// use url::Url;
///
/// let home = Url::parse("https://example.com/").unwrap();
/// let about = Url::parse("https://example.com/about").unwrap();
/// let depths = HashMap::from([(home.clone(), 0), (about.clone(), 1)]);
///
/// let sample = select_sample(&[home.clone(), about.clone()], &home, &depths, 0.0);
/// assert!(sample.contains(&home) && sample.contains(&about));
/// ```
pub fn select_sample(
    pages: &[Url],
    homepage: &Url,
    depth_map: &HashMap<Url, u32>,
    rate: f64,
) -> HashSet<Url> {
    select_sample_with(pages, homepage, depth_map, rate, &mut rand::rng())
}

/// [`select_sample`] with an explicit random source
pub fn select_sample_with<R: Rng + ?Sized>(
    pages: &[Url],
    homepage: &Url,
    depth_map: &HashMap<Url, u32>,
    rate: f64,
    rng: &mut R,
) -> HashSet<Url> {
    let mut selected = HashSet::new();

    if pages.contains(homepage) {
        selected.insert(homepage.clone());
    }

    for page in pages {
        if depth_map.get(page) == Some(&1) {
            selected.insert(page.clone());
        }
    }

    let rate = rate.clamp(0.0, 1.0);
    let target = selected.len().max((pages.len() as f64 * rate).floor() as usize);
    let needed = target.saturating_sub(selected.len());

    if needed > 0 {
        let mut remaining: Vec<&Url> = pages.iter().filter(|p| !selected.contains(*p)).collect();
        remaining.sort();
        remaining.dedup();
        remaining.shuffle(rng);

        selected.extend(remaining.into_iter().take(needed).cloned());
    }

    selected
}
