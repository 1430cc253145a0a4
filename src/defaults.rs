//! Built-in plan for a desktop application build host.
//!
//! Three `apt-get` invocations through `sudo`: refresh the package index,
//! install the native toolchain, then install the secret-storage packages.

use crate::plan::{RunPlan, Step};

/// Privilege escalation wrapper for the package manager
pub const ESCALATION_COMMAND: &str = "sudo";

/// Package manager executable
pub const PACKAGE_MANAGER: &str = "apt-get";

/// Compiler toolchain, build tools and GUI toolkit headers
pub const CORE_PACKAGES: &[&str] = &[
    "clang",
    "cmake",
    "git",
    "ninja-build",
    "pkg-config",
    "libgtk-3-dev",
    "liblzma-dev",
    "libstdc++-12-dev",
];

/// Secret-storage integration packages
pub const KEYRING_PACKAGES: &[&str] = &["gnome-keyring", "libsecret-1-0", "libsecret-1-dev"];

fn apt_get(name: &str) -> Step {
    Step::new(name, ESCALATION_COMMAND).arg(PACKAGE_MANAGER)
}

fn apt_install(name: &str, packages: &[&str]) -> Step {
    apt_get(name).args(["install", "-y"]).args(packages.iter().copied())
}

/// The plan run when no plan file is given.
///
/// `install-keyring` is last, so continuing past its failure only affects
/// the exit code: the failure is reported and the run still completes.
pub fn desktop_toolchain_plan() -> RunPlan {
    RunPlan::builder()
        .step(apt_get("update").arg("update"))
        .step(apt_install("install-core", CORE_PACKAGES))
        .step(apt_install("install-keyring", KEYRING_PACKAGES).continue_on_failure(true))
        .build()
}
