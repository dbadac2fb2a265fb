//! Built-in templates and overlay discovery.
//!
//! Every template the generators reference is compiled into the binary from
//! `templates/<id>.jinja`, so a bare `fastkit` executable needs nothing on
//! disk. A directory of overrides can be layered on top.
//!
//! # Overlay resolution order
//!
//! 1. **`$FASTKIT_TEMPLATES_DIR`**, the environment override.
//! 2. **`templates.local_path`** from the CLI configuration.
//!
//! The first candidate that exists is used. When neither is set the embedded
//! set is used unchanged. A candidate that is set but missing is logged at
//! `WARN` and skipped.
//!
//! ```env
//! FASTKIT_TEMPLATES_DIR=./my-templates
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use fastkit_core::error::FastkitResult;

use crate::template_set::TemplateSet;

/// Environment variable naming an overlay directory.
pub const TEMPLATES_DIR_ENV: &str = "FASTKIT_TEMPLATES_DIR";

macro_rules! embed {
    ($($id:literal),* $(,)?) => {
        &[$(($id, include_str!(concat!("../templates/", $id, ".jinja")))),*]
    };
}

/// `(template id, source)` for every embedded template.
pub static BUILTIN: &[(&str, &str)] = embed![
    // ── project ──────────────────────────────────────────────────────────────
    "project/pyproject.toml",
    "project/README.md",
    "project/.gitignore",
    "project/ci.yml",
    "project/Dockerfile",
    "project/.dockerignore",
    "project/docker-compose.yml",
    // ── service tree ─────────────────────────────────────────────────────────
    "service/app/__init__.py",
    "service/app/main.py",
    "service/app/core/__init__.py",
    "service/app/core/config.py",
    "service/app/core/dependencies.py",
    "service/app/api/__init__.py",
    "service/app/api/v1/__init__.py",
    "service/app/api/v1/routes.py",
    "service/app/models/__init__.py",
    "service/app/services/__init__.py",
    "service/app/repositories/__init__.py",
    "service/app/domains/__init__.py",
    "service/tests/__init__.py",
    "service/tests/conftest.py",
    "service/infra/.gitkeep",
    // ── microservices ────────────────────────────────────────────────────────
    "microservices/gateway/main.py",
    "microservices/shared/__init__.py",
    "microservices/shared/config.py",
    "microservices/shared/models.py",
    "microservices/docker-compose.yml",
    // ── onion ────────────────────────────────────────────────────────────────
    "onion/__init__.py",
    "onion/entity.py",
    "onion/command_bus.py",
    "onion/query_bus.py",
    "onion/main.py",
    // ── frontend ─────────────────────────────────────────────────────────────
    "frontend/package.json",
    "frontend/README.md",
    "frontend/.gitignore",
    "frontend/index.html",
    "frontend/vite.config",
    "frontend/webpack.config.js",
    "frontend/tsconfig.json",
    "frontend/react/main",
    "frontend/react/App",
    "frontend/vue/main",
    "frontend/vue/App.vue",
    "frontend/svelte/main",
    "frontend/svelte/App.svelte",
    // ── pluggable services ───────────────────────────────────────────────────
    "services/db/__init__.py",
    "services/db/base.py",
    "services/db/session.py",
    "services/db/base_model.py",
    "services/db/postgresql_client.py",
    "services/db/mysql_client.py",
    "services/db/sqlite_client.py",
    "services/db/mongodb_client.py",
    "services/db/mssql_client.py",
    "services/cache/__init__.py",
    "services/cache/redis_client.py",
    "services/cache/memcached_client.py",
    "services/cache/dynamodb_client.py",
    "services/cache/memory_client.py",
    "services/auth/__init__.py",
    "services/auth/jwt_provider.py",
    "services/auth/oauth_provider.py",
    "services/auth/dependencies.py",
    "services/jobs/__init__.py",
    "services/jobs/tasks.py",
    "services/jobs/celery_scheduler.py",
    "services/jobs/rq_scheduler.py",
    "services/jobs/dramatiq_scheduler.py",
    "services/jobs/arq_scheduler.py",
    "services/jobs/apscheduler_scheduler.py",
    // ── domains ──────────────────────────────────────────────────────────────
    "domain/__init__.py",
    "domain/models.py",
    "domain/schemas.py",
    "domain/repositories.py",
    "domain/services.py",
    "domain/routes.py",
    "domain/dependencies.py",
    "domain/exceptions.py",
    "domain/tests/__init__.py",
    "domain/tests/test_models.py",
    "domain/tests/test_routes.py",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Embedded templates with the resolved overlay, if any, applied on top.
///
/// # Errors
///
/// Propagates failures to walk an overlay directory that exists.
#[instrument(skip_all)]
pub fn all_templates(configured: Option<&Path>) -> FastkitResult<TemplateSet> {
    let set = TemplateSet::builtin();
    match overlay_dir(configured) {
        Some(dir) => {
            info!(path = %dir.display(), "using template overlay");
            set.with_overlay(&dir)
        }
        None => {
            debug!(count = set.len(), "using embedded templates only");
            Ok(set)
        }
    }
}

/// First existing overlay directory, per the module-level resolution order.
pub fn overlay_dir(configured: Option<&Path>) -> Option<PathBuf> {
    candidate_paths(configured).into_iter().find(|candidate| {
        let exists = candidate.is_dir();
        if !exists {
            warn!(path = %candidate.display(), "template overlay directory not found, skipping");
        }
        exists
    })
}

// ── Resolution helpers ────────────────────────────────────────────────────────

/// Candidate overlay directories in priority order. Unset sources are omitted.
fn candidate_paths(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);

    if let Ok(env_path) = std::env::var(TEMPLATES_DIR_ENV) {
        if !env_path.trim().is_empty() {
            paths.push(PathBuf::from(env_path));
        }
    }
    if let Some(path) = configured {
        paths.push(path.to_path_buf());
    }

    paths
}
