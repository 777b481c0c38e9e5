//! Random two-word job names used to prefill new forms.

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "amber", "bold", "brave", "calm", "clever", "cosmic", "crisp", "curly", "eager", "fancy",
    "gentle", "golden", "happy", "jolly", "lively", "lucky", "mellow", "nimble", "proud", "quiet",
    "rapid", "shiny", "silent", "smooth", "sunny", "swift", "tidy", "vivid", "witty", "young",
];

const NOUNS: &[&str] = &[
    "otter", "falcon", "maple", "river", "comet", "harbor", "lantern", "meadow", "pebble",
    "summit", "willow", "beacon", "canyon", "ember", "forest", "glacier", "island", "jungle",
    "kitten", "lagoon", "nebula", "orchid", "panda", "quartz", "rocket", "spruce", "tiger",
    "valley", "walrus", "zephyr",
];

/// Generate a job name such as `brave-otter`
pub fn random_job_name() -> String {
    random_job_name_with(&mut rand::thread_rng())
}

pub fn random_job_name_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("new");
    let noun = NOUNS.choose(rng).copied().unwrap_or("job");
    format!("{}-{}", adjective, noun)
}
