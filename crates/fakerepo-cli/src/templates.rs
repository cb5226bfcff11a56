//! Content of every file written into a generated repository.

use std::collections::BTreeMap;

use fakerepo_core::Package;
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::DependencyProtocol;

/// Script every package's npm scripts call into, relative to the package.
pub const FAKE_BUILD_INVOCATION: &str = "node ../../fake-build.js";

pub const GIT_IGNORE: &str = "dist\n.turbo\n";

/// Node script standing in for a real build. Takes a duration in
/// milliseconds as its only argument and records a log line in the
/// package's `dist` folder for `build` runs.
pub const FAKE_BUILD_SCRIPT: &str = r#"const { existsSync, mkdirSync, writeFileSync } = require('fs');
const { join, resolve } = require('path');

const pkgName = process.env.npm_package_name;
const task = process.env.npm_lifecycle_event;
const rawDuration = Number(process.argv[2]);
const duration = Number.isNaN(rawDuration) ? 0 : rawDuration;

const dirPath = resolve(__dirname, 'packages', pkgName, 'dist');
const logPath = join(dirPath, `${task}-log.txt`);

console.log(task, pkgName, 'starting');

setTimeout(() => {
  if (task === 'build') {
    if (!existsSync(dirPath)) {
      mkdirSync(dirPath);
    }
    writeFileSync(logPath, `Built ${pkgName}`, 'utf-8');
  }
  console.log(task, pkgName, 'done');
}, duration);
"#;

/// Root `README.md` describing how to drive the fake repository.
#[must_use]
pub fn root_readme(package_count: usize, seed: &str) -> String {
    format!(
        r"# Test Monorepo

This folder contains a generated test monorepo. It uses the workspaces
feature and contains {package_count} applications and libraries with
dependencies between each other. It was generated from seed `{seed}`;
generating again with the same seed and options reproduces it exactly.

This can be useful when testing build tools and other monorepo tooling that
orchestrate running tasks for the workspaces.

Every package has npm scripts for `build`, `test` and `lint`. These don't
perform any real work, but the `build` task will emit a file to the `dist`
folder of the workspace.

## Running builds

### Yarn 1

Yarn 1 does not build workspaces in dependency order without extra tooling.

### Yarn 2

With the `workspace-tools` plugin:

```console
yarn workspaces foreach --topological-dev --parallel --verbose run build
```

### pnpm

```console
npx pnpm run -r build
```

### oao

```console
npx oao run-script --tree --parallel build
```

### Turborepo

Requires `turbo.json` (generate with `--with-turbo`).

```console
npx turbo run build
```

### nx

Requires `nx.json` (generate with `--with-nx`).

```console
npx nx run-many --target=build --all
```
"
    )
}

#[must_use]
pub fn turbo_config() -> Value {
    json!({
        "$schema": "https://turborepo.org/schema.json",
        "baseBranch": "origin/main",
        "pipeline": {
            "build": { "dependsOn": ["^build"], "outputs": [".next/**"] },
            "test": { "dependsOn": ["^build"], "outputs": [] },
            "lint": { "outputs": [] },
            "dev": { "cache": false }
        }
    })
}

#[must_use]
pub fn nx_config() -> Value {
    json!({
        "extends": "nx/presets/npm.json",
        "tasksRunnerOptions": {
            "default": {
                "runner": "nx/tasks-runners/default",
                "options": { "cacheableOperations": ["build", "test", "lint"] }
            }
        },
        "targetDependencies": {
            "build": [{ "target": "build", "projects": "dependencies" }]
        },
        "affected": { "defaultBase": "master" },
        "pluginsConfig": { "@nrwl/js": { "analyzeSourceFiles": false } }
    })
}

/// Root `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootManifest {
    pub name: &'static str,
    pub private: bool,
    pub workspaces: Vec<&'static str>,
    pub scripts: BTreeMap<&'static str, &'static str>,
    pub dev_dependencies: BTreeMap<&'static str, &'static str>,
}

#[must_use]
pub fn root_manifest(with_turbo: bool, with_nx: bool) -> RootManifest {
    let mut scripts = BTreeMap::from([
        (
            "build-yarn1",
            "echo \"yarn 1 can't build topologically out of the box\"",
        ),
        (
            "build-yarn2",
            "yarn workspaces foreach --topological-dev --parallel --verbose run build",
        ),
        ("build-oao", "npx oao run-script --tree --parallel build"),
        ("build-pnpm", "npx pnpm run -r build"),
    ]);
    let mut dev_dependencies = BTreeMap::new();

    if with_nx {
        dev_dependencies.insert("nx", "^14.1.0");
        scripts.insert("build-nx", "npx nx run-many --target=build --all");
    }
    if with_turbo {
        scripts.insert("build-turbo", "npx turbo run build");
    }

    RootManifest {
        name: "test",
        private: true,
        workspaces: vec!["packages/*"],
        scripts,
        dev_dependencies,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageScripts {
    pub build: String,
    pub test: String,
    pub lint: String,
}

/// Per-package `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    pub name: String,
    pub private: bool,
    pub version: &'static str,
    pub scripts: PackageScripts,
    pub dependencies: BTreeMap<String, &'static str>,
}

#[must_use]
pub fn package_manifest(package: &Package, protocol: DependencyProtocol) -> PackageManifest {
    let version = protocol.version_spec();
    PackageManifest {
        name: package.name.clone(),
        private: true,
        version: "1.0.0",
        scripts: PackageScripts {
            build: format!("{FAKE_BUILD_INVOCATION} {}", package.build_millis),
            test: FAKE_BUILD_INVOCATION.to_string(),
            lint: FAKE_BUILD_INVOCATION.to_string(),
        },
        dependencies: package
            .dependencies
            .iter()
            .map(|dep| (dep.clone(), version))
            .collect(),
    }
}

/// Pretty JSON with a trailing newline, the way formatters leave files.
///
/// # Errors
///
/// Returns an error if `value` fails to serialize.
pub fn to_json_file<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> Package {
        let mut p = Package::new(1, "app-01".into(), None);
        p.dependencies = vec!["lib-1_02".into(), "lib-1_05".into()];
        p.build_millis = 2500;
        p
    }

    #[test]
    fn package_manifest_carries_build_time_and_deps() {
        let manifest = package_manifest(&package(), DependencyProtocol::Yarn1);
        assert_eq!(manifest.scripts.build, "node ../../fake-build.js 2500");
        assert_eq!(manifest.scripts.test, "node ../../fake-build.js");
        assert_eq!(manifest.dependencies.get("lib-1_02"), Some(&"1.0.0"));
        assert_eq!(manifest.dependencies.len(), 2);
    }

    #[test]
    fn workspace_protocol_uses_star() {
        let manifest = package_manifest(&package(), DependencyProtocol::Workspace);
        assert!(manifest.dependencies.values().all(|v| *v == "workspace:*"));
    }

    #[test]
    fn package_manifest_json_shape() {
        let json = to_json_file(&package_manifest(&package(), DependencyProtocol::Yarn1))
            .expect("serialize");
        assert!(json.ends_with("}\n"));
        let value: Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["name"], "app-01");
        assert_eq!(value["private"], true);
        assert_eq!(value["dependencies"]["lib-1_05"], "1.0.0");
    }

    #[test]
    fn root_manifest_toggles_orchestrators() {
        let plain = root_manifest(false, false);
        assert!(!plain.scripts.contains_key("build-nx"));
        assert!(!plain.scripts.contains_key("build-turbo"));
        assert!(plain.dev_dependencies.is_empty());

        let both = root_manifest(true, true);
        assert_eq!(both.scripts.get("build-turbo"), Some(&"npx turbo run build"));
        assert_eq!(both.dev_dependencies.get("nx"), Some(&"^14.1.0"));
    }

    #[test]
    fn root_manifest_uses_camel_case_keys() {
        let value = serde_json::to_value(root_manifest(false, true)).expect("serialize");
        assert!(value.get("devDependencies").is_some());
        assert_eq!(value["workspaces"][0], "packages/*");
    }

    #[test]
    fn readme_mentions_count_and_seed() {
        let readme = root_readme(32, "abc");
        assert!(readme.contains("contains 32 applications"));
        assert!(readme.contains("seed `abc`"));
    }

    #[test]
    fn turbo_build_depends_on_upstream_builds() {
        assert_eq!(turbo_config()["pipeline"]["build"]["dependsOn"][0], "^build");
        assert_eq!(nx_config()["targetDependencies"]["build"][0]["projects"], "dependencies");
    }
}
