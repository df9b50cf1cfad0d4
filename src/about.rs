pub const MANELOCA_DISPLAY_VERSION: &str = env!("MANELOCA_DISPLAY_VERSION");
pub const MANELOCA_BUILD_N: &str = env!("MANELOCA_BUILD_N");
pub const SOURCE_URL: &str = "https://github.com/pzweuj/ManeLoca";

pub fn version_cli_text() -> String {
    format!(
        "ManeLoca {}\nBuild {}\nMANE Select exon/intron coordinate viewer",
        MANELOCA_DISPLAY_VERSION, MANELOCA_BUILD_N
    )
}
