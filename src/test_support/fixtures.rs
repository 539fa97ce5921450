//! Test fixtures for common test scenarios.
//!
//! This module provides pre-built source trees and fixture generators
//! for common testing patterns in Sandcastle.

use std::collections::BTreeMap;

use crate::core::tree::{Module, SourceTree};

/// Fixture for a complete project tree.
#[derive(Debug, Clone, Default)]
pub struct TreeFixture {
    /// package.json content (None to leave it out).
    pub manifest: Option<String>,
    /// Files (path -> content).
    pub files: BTreeMap<String, String>,
}

impl TreeFixture {
    /// Create a new empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// A create-react-app style project with a public index.html.
    pub fn react_app() -> Self {
        TreeFixture::new()
            .manifest(
                r#"{
  "name": "react-app",
  "description": "A React app",
  "keywords": ["react", "starter"],
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0",
    "react-scripts": "5.0.1"
  },
  "devDependencies": {
    "@testing-library/react": "^14.0.0",
    "eslint": "^8.0.0"
  }
}"#,
            )
            .file(
                "src/index.js",
                "import React from 'react';\nimport ReactDOM from 'react-dom/client';\nimport App from './App';\n",
            )
            .file(
                "src/App.test.js",
                "import { render } from '@testing-library/react';\n",
            )
            .file("src/App.js", "export default function App() { return null; }\n")
            .file(
                "public/index.html",
                r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5/dist/css/bootstrap.min.css" />
    <title>React App</title>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>"#,
            )
    }

    /// A plain node project.
    pub fn node_app() -> Self {
        TreeFixture::new()
            .manifest(
                r#"{
  "name": "server",
  "main": "server.js",
  "dependencies": { "express": "^4.18.0" },
  "devDependencies": { "nodemon": "^3.0.0", "supertest": "^6.3.0" }
}"#,
            )
            .file("server.js", "const express = require('express');\n")
            .file("test/server.test.js", "const request = require('supertest');\n")
    }

    /// A static site with no dependencies.
    pub fn static_site() -> Self {
        TreeFixture::new()
            .manifest(r#"{ "name": "site" }"#)
            .file(
                "index.html",
                r#"<html><head><script src="https://unpkg.com/alpinejs"></script></head><body><h1>Hello</h1></body></html>"#,
            )
    }

    /// Set the manifest content.
    pub fn manifest(mut self, content: &str) -> Self {
        self.manifest = Some(content.to_string());
        self
    }

    /// Remove the manifest.
    pub fn without_manifest(mut self) -> Self {
        self.manifest = None;
        self
    }

    /// Add a file.
    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// Remove a file.
    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// Build the source tree.
    pub fn build(&self) -> SourceTree {
        let mut tree = SourceTree::new();
        if let Some(ref manifest) = self.manifest {
            tree.insert("package.json", Module::new(manifest.clone()));
        }
        for (path, content) in &self.files {
            tree.insert(path, Module::new(content.clone()));
        }
        tree
    }

    /// Write the fixture to a directory on disk.
    pub fn write_to(&self, root: &std::path::Path) -> std::io::Result<()> {
        let mut entries: Vec<(String, &String)> =
            self.files.iter().map(|(p, c)| (p.clone(), c)).collect();
        if let Some(ref manifest) = self.manifest {
            entries.push(("package.json".to_string(), manifest));
        }
        for (path, content) in entries {
            let full = root.join(&path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full, content)?;
        }
        Ok(())
    }
}
