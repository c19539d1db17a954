use crate::{EditionProfile, FleetSettings};

use cs_core::Edition;

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};

#[test]
fn given_base_path_when_with_base_path_then_defaults_are_applied() {
    let settings = FleetSettings::with_base_path("/srv/fleet");

    assert_that!(settings.bedrock_default_port, eq(19132));
    assert_that!(settings.java_default_port, eq(25565));
    assert_that!(settings.backup_quiescence, eq(Duration::from_secs(5)));
    assert!(settings.manifest_path().ends_with("servers.json"));
}

#[test]
fn given_java_without_memory_when_profile_then_fleet_default_is_used() {
    let settings = FleetSettings::with_base_path("/srv/fleet");

    let profile = settings.profile(Edition::Java, None);

    assert!(matches!(profile, EditionProfile::Java(_)));
    assert_that!(profile.max_memory_mb(), some(eq(settings.java_max_memory_mb)));
}

#[test]
fn given_bedrock_with_memory_when_profile_then_memory_is_ignored() {
    let settings = FleetSettings::with_base_path("/srv/fleet");

    let profile = settings.profile(Edition::Bedrock, Some(4096));

    assert_that!(profile.edition(), eq(Edition::Bedrock));
    assert_that!(profile.max_memory_mb(), none());
}
