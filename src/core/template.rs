//! Template classification.
//!
//! A template decides the default entry file and how the sandbox is built
//! downstream. Classification walks a priority-ordered rule list; the first
//! matching rule wins and [`Template::Node`] catches everything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::manifest::PackageJson;
use crate::core::tree::SourceTree;

/// Supported sandbox templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    CreateReactApp,
    CreateReactAppTypescript,
    AngularCli,
    PreactCli,
    Svelte,
    VueCli,
    Parcel,
    Reason,
    Static,
    Node,
}

impl Template {
    /// All templates, in classification priority order where it applies.
    pub const ALL: [Template; 10] = [
        Template::CreateReactAppTypescript,
        Template::CreateReactApp,
        Template::AngularCli,
        Template::PreactCli,
        Template::Svelte,
        Template::VueCli,
        Template::Parcel,
        Template::Reason,
        Template::Static,
        Template::Node,
    ];

    /// Template identifier as used in descriptors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::CreateReactApp => "create-react-app",
            Template::CreateReactAppTypescript => "create-react-app-typescript",
            Template::AngularCli => "angular-cli",
            Template::PreactCli => "preact-cli",
            Template::Svelte => "svelte",
            Template::VueCli => "vue-cli",
            Template::Parcel => "parcel",
            Template::Reason => "reason",
            Template::Static => "static",
            Template::Node => "node",
        }
    }

    /// Default entry file for this template.
    pub fn default_entry_file(&self) -> &'static str {
        match self {
            Template::CreateReactApp => "src/index.js",
            Template::CreateReactAppTypescript => "src/index.tsx",
            Template::AngularCli => "src/main.ts",
            Template::PreactCli => "index.js",
            Template::Svelte => "index.js",
            Template::VueCli => "src/main.js",
            Template::Parcel => "index.html",
            Template::Reason => "src/index.re",
            Template::Static => "index.html",
            Template::Node => "index.js",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown template: {}", s))
    }
}

type Predicate = fn(&PackageJson, &SourceTree) -> bool;

/// Classification rules, evaluated in order.
const RULES: &[(Predicate, Template)] = &[
    (
        |pkg, tree| {
            pkg.declares("react-scripts-ts")
                || (pkg.declares("react-scripts") && tree.contains("tsconfig.json"))
        },
        Template::CreateReactAppTypescript,
    ),
    (|pkg, _| pkg.declares("react-scripts"), Template::CreateReactApp),
    (
        |pkg, tree| {
            pkg.declares("@angular/core")
                || tree.contains("angular.json")
                || tree.contains(".angular-cli.json")
        },
        Template::AngularCli,
    ),
    (|pkg, _| pkg.declares("preact-cli"), Template::PreactCli),
    (|pkg, _| pkg.declares("svelte"), Template::Svelte),
    (
        |pkg, _| pkg.declares("vue") || pkg.declares("@vue/cli-service"),
        Template::VueCli,
    ),
    (
        |pkg, _| pkg.declares("parcel-bundler") || pkg.declares("parcel"),
        Template::Parcel,
    ),
    (
        |pkg, tree| {
            (pkg.declares("reason-react") || pkg.declares("bs-platform"))
                && tree
                    .paths()
                    .any(|p| p.ends_with(".re") || p.ends_with(".ml"))
        },
        Template::Reason,
    ),
    (|pkg, _| pkg.declares("react"), Template::CreateReactApp),
    (
        |pkg, tree| pkg.has_no_dependencies() && tree.contains("index.html"),
        Template::Static,
    ),
];

/// Classify a project into a template.
pub fn classify(pkg: &PackageJson, tree: &SourceTree) -> Template {
    RULES
        .iter()
        .find(|(matches, _)| matches(pkg, tree))
        .map(|(_, template)| *template)
        .unwrap_or(Template::Node)
}

/// Default entry file for a template.
pub fn default_entry_file(template: Template) -> &'static str {
    template.default_entry_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(json: &str) -> PackageJson {
        PackageJson::parse(json).unwrap()
    }

    #[test]
    fn test_create_react_app() {
        let pkg = pkg(r#"{"dependencies": {"react": "^18", "react-scripts": "5.0.1"}}"#);
        assert_eq!(classify(&pkg, &SourceTree::new()), Template::CreateReactApp);
    }

    #[test]
    fn test_create_react_app_typescript_by_marker() {
        let pkg = pkg(r#"{"devDependencies": {"react-scripts": "5.0.1"}}"#);
        let tree = SourceTree::new().with_file("tsconfig.json", "{}");
        assert_eq!(classify(&pkg, &tree), Template::CreateReactAppTypescript);
    }

    #[test]
    fn test_angular_by_marker_file() {
        let tree = SourceTree::new().with_file("angular.json", "{}");
        assert_eq!(classify(&PackageJson::default(), &tree), Template::AngularCli);
    }

    #[test]
    fn test_vue_beats_plain_react() {
        let pkg = pkg(r#"{"dependencies": {"vue": "^3", "react": "^18"}}"#);
        assert_eq!(classify(&pkg, &SourceTree::new()), Template::VueCli);
    }

    #[test]
    fn test_reason_needs_source_files() {
        let pkg = pkg(r#"{"dependencies": {"reason-react": "^0.9"}}"#);
        assert_eq!(classify(&pkg, &SourceTree::new()), Template::Node);

        let tree = SourceTree::new().with_file("src/App.re", "");
        assert_eq!(classify(&pkg, &tree), Template::Reason);
    }

    #[test]
    fn test_static_html() {
        let tree = SourceTree::new().with_file("index.html", "<p>hi</p>");
        assert_eq!(classify(&PackageJson::default(), &tree), Template::Static);

        let with_deps = pkg(r#"{"dependencies": {"express": "^4"}}"#);
        assert_eq!(classify(&with_deps, &tree), Template::Node);
    }

    #[test]
    fn test_default_is_node() {
        assert_eq!(
            classify(&PackageJson::default(), &SourceTree::new()),
            Template::Node
        );
    }

    #[test]
    fn test_default_entry_files() {
        assert_eq!(default_entry_file(Template::CreateReactApp), "src/index.js");
        assert_eq!(default_entry_file(Template::AngularCli), "src/main.ts");
        assert_eq!(default_entry_file(Template::Static), "index.html");
        assert_eq!(default_entry_file(Template::Node), "index.js");
    }

    #[test]
    fn test_template_identifier_round_trip() {
        for template in Template::ALL {
            assert_eq!(template.as_str().parse::<Template>().unwrap(), template);
            let json = serde_json::to_string(&template).unwrap();
            assert_eq!(json, format!("\"{}\"", template));
        }
        assert!("gatsby".parse::<Template>().is_err());
    }
}
