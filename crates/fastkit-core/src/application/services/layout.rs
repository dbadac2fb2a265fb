//! Fixed directory and template tables for each project layout.
//!
//! Every entry pairs a template id with the path it is written to, relative
//! to the root it is materialized under.

use crate::domain::{BuildTool, FrontendConfig, FrontendFramework, FrontendLanguage};

/// A template rendered to a relative output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub template: &'static str,
    pub target: String,
}

impl Placement {
    fn new(template: &'static str, target: impl Into<String>) -> Self {
        Self {
            template,
            target: target.into(),
        }
    }
}

// ── Service tree ─────────────────────────────────────────────────────────────

/// Directories of one FastAPI service, created even when empty.
pub const SERVICE_DIRECTORIES: &[&str] = &[
    "app",
    "app/api",
    "app/api/v1",
    "app/core",
    "app/models",
    "app/services",
    "app/repositories",
    "app/domains",
    "tests",
    "infra",
];

pub const SERVICE_FILES: &[(&str, &str)] = &[
    ("service/app/__init__.py", "app/__init__.py"),
    ("service/app/main.py", "app/main.py"),
    ("service/app/core/__init__.py", "app/core/__init__.py"),
    ("service/app/core/config.py", "app/core/config.py"),
    ("service/app/core/dependencies.py", "app/core/dependencies.py"),
    ("service/app/api/__init__.py", "app/api/__init__.py"),
    ("service/app/api/v1/__init__.py", "app/api/v1/__init__.py"),
    ("service/app/api/v1/routes.py", "app/api/v1/routes.py"),
    ("service/app/models/__init__.py", "app/models/__init__.py"),
    ("service/app/services/__init__.py", "app/services/__init__.py"),
    ("service/app/repositories/__init__.py", "app/repositories/__init__.py"),
    ("service/app/domains/__init__.py", "app/domains/__init__.py"),
    ("service/tests/__init__.py", "tests/__init__.py"),
    ("service/tests/conftest.py", "tests/conftest.py"),
    ("service/infra/.gitkeep", "infra/.gitkeep"),
];

/// Replaces `app/main.py` inside the microservice gateway.
pub const GATEWAY_MAIN_TEMPLATE: &str = "microservices/gateway/main.py";

// ── Top-level files ──────────────────────────────────────────────────────────

pub const PROJECT_FILES: &[(&str, &str)] = &[
    ("project/pyproject.toml", "pyproject.toml"),
    ("project/.gitignore", ".gitignore"),
];

/// Lists the selected providers, so it is re-rendered when one changes.
pub const README: (&str, &str) = ("project/README.md", "README.md");

pub const CICD_FILES: &[(&str, &str)] = &[("project/ci.yml", ".github/workflows/ci.yml")];

pub const DOCKER_FILES: &[(&str, &str)] = &[
    ("project/Dockerfile", "Dockerfile"),
    ("project/.dockerignore", ".dockerignore"),
];

pub const COMPOSE_TEMPLATE: &str = "project/docker-compose.yml";

// ── Microservices ────────────────────────────────────────────────────────────

pub const SHARED_FILES: &[(&str, &str)] = &[
    ("microservices/shared/__init__.py", "shared/__init__.py"),
    ("microservices/shared/config.py", "shared/config.py"),
    ("microservices/shared/models.py", "shared/models.py"),
];

pub const MICROSERVICES_COMPOSE_TEMPLATE: &str = "microservices/docker-compose.yml";

// ── Onion ────────────────────────────────────────────────────────────────────

/// Layers under `src/` and their fixed sub-folders.
pub const ONION_LAYERS: &[(&str, &[&str])] = &[
    ("domain", &["entities", "value_objects", "repositories", "services"]),
    ("application", &["services", "dto", "interfaces"]),
    ("infrastructure", &["persistence", "repositories", "external"]),
    ("presentation", &["api", "schemas"]),
];

/// Sub-folders added to `src/application` with CQRS.
pub const CQRS_FOLDERS: &[&str] = &["commands", "queries"];

pub const ONION_INIT_TEMPLATE: &str = "onion/__init__.py";
pub const ONION_ENTITY_TEMPLATE: &str = "onion/entity.py";
pub const ONION_CQRS_TEMPLATES: &[(&str, &str)] = &[
    ("onion/command_bus.py", "src/application/commands/bus.py"),
    ("onion/query_bus.py", "src/application/queries/bus.py"),
];
pub const ONION_MAIN: (&str, &str) = ("onion/main.py", "src/presentation/api/main.py");

/// Every `src/` folder that gets an `__init__.py`, layers first.
pub fn onion_packages(cqrs: bool) -> Vec<String> {
    let mut packages = Vec::new();
    for (layer, folders) in ONION_LAYERS {
        packages.push(format!("src/{layer}"));
        packages.extend(folders.iter().map(|f| format!("src/{layer}/{f}")));
        if cqrs && *layer == "application" {
            packages.extend(CQRS_FOLDERS.iter().map(|f| format!("src/{layer}/{f}")));
        }
    }
    packages
}

// ── Frontend ─────────────────────────────────────────────────────────────────

/// Frontend files for a (framework, build tool, language) choice.
pub fn frontend_layout(frontend: &FrontendConfig) -> Vec<Placement> {
    let script = match frontend.language {
        FrontendLanguage::TypeScript => "ts",
        FrontendLanguage::JavaScript => "js",
    };

    let mut files = vec![
        Placement::new("frontend/package.json", "frontend/package.json"),
        Placement::new("frontend/README.md", "frontend/README.md"),
        Placement::new("frontend/.gitignore", "frontend/.gitignore"),
    ];

    match frontend.build_tool {
        BuildTool::Vite => {
            files.push(Placement::new("frontend/index.html", "frontend/index.html"));
            files.push(Placement::new(
                "frontend/vite.config",
                format!("frontend/vite.config.{script}"),
            ));
        }
        BuildTool::Webpack => {
            files.push(Placement::new(
                "frontend/index.html",
                "frontend/public/index.html",
            ));
            files.push(Placement::new(
                "frontend/webpack.config.js",
                "frontend/webpack.config.js",
            ));
        }
    }

    if frontend.language == FrontendLanguage::TypeScript {
        files.push(Placement::new("frontend/tsconfig.json", "frontend/tsconfig.json"));
    }

    match frontend.framework {
        FrontendFramework::React => {
            let jsx = format!("{script}x");
            files.push(Placement::new(
                "frontend/react/main",
                format!("frontend/src/main.{jsx}"),
            ));
            files.push(Placement::new(
                "frontend/react/App",
                format!("frontend/src/App.{jsx}"),
            ));
        }
        FrontendFramework::Vue => {
            files.push(Placement::new(
                "frontend/vue/main",
                format!("frontend/src/main.{script}"),
            ));
            files.push(Placement::new("frontend/vue/App.vue", "frontend/src/App.vue"));
        }
        FrontendFramework::Svelte => {
            files.push(Placement::new(
                "frontend/svelte/main",
                format!("frontend/src/main.{script}"),
            ));
            files.push(Placement::new(
                "frontend/svelte/App.svelte",
                "frontend/src/App.svelte",
            ));
        }
    }
    files
}

/// Entry module the frontend `index.html` loads, relative to `frontend/`.
pub fn frontend_entry(frontend: &FrontendConfig) -> String {
    let script = match (frontend.framework, frontend.language) {
        (FrontendFramework::React, FrontendLanguage::TypeScript) => "tsx",
        (FrontendFramework::React, FrontendLanguage::JavaScript) => "jsx",
        (_, FrontendLanguage::TypeScript) => "ts",
        (_, FrontendLanguage::JavaScript) => "js",
    };
    format!("src/main.{script}")
}
