use vergen_gitcl::{Build, Emitter, Gitcl};

// Emits VERGEN_BUILD_TIMESTAMP and VERGEN_GIT_{BRANCH,SHA,DIRTY} for
// `version_string()`. Outside a git checkout the git values are left unset.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = Build::builder().build_timestamp(true).build();
    let git = Gitcl::builder().branch(true).sha(true).dirty(true).build();

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&git)?
        .emit()?;

    Ok(())
}
