use devhub_types::{
    Category, NewProject, NewRepositoryLink, ProjectStatus, ProjectSummary, RepositoryKind,
};

use crate::{
    backend::SharedBackend,
    error::{ClientError, FormError},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn admits(&self, project: &ProjectSummary) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => project.category_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// Case-insensitive substring match on title or description.
pub fn matches_search(project: &ProjectSummary, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty()
        || project.title.to_lowercase().contains(&needle)
        || project.description.to_lowercase().contains(&needle)
}

#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub status: ProjectStatus,
    pub repository_kind: RepositoryKind,
    /// Blank means no repository link.
    pub repository_url: String,
}

impl ProjectForm {
    fn into_request(self) -> Result<NewProject, FormError> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();
        if title.is_empty() || description.is_empty() {
            return Err(FormError::Invalid(
                "Title and description are required".to_string(),
            ));
        }
        let url = self.repository_url.trim();
        let repository = (!url.is_empty()).then(|| NewRepositoryLink {
            kind: self.repository_kind,
            url: url.to_string(),
        });
        Ok(NewProject {
            title,
            description,
            category_id: self.category_id.filter(|id| !id.trim().is_empty()),
            status: self.status,
            repository,
        })
    }
}

/// The project board: published projects, the caller's own projects and
/// the search and category filters applied to them.
pub struct ProjectsView {
    backend: SharedBackend,
    categories: Vec<Category>,
    projects: Vec<ProjectSummary>,
    mine: Vec<ProjectSummary>,
    pub search: String,
    pub category: CategoryFilter,
}

impl ProjectsView {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            categories: Vec::new(),
            projects: Vec::new(),
            mine: Vec::new(),
            search: String::new(),
            category: CategoryFilter::All,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn projects(&self) -> &[ProjectSummary] {
        &self.projects
    }

    pub fn mine(&self) -> &[ProjectSummary] {
        &self.mine
    }

    /// Reloads categories and the published list. On error the previous
    /// lists are kept.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let (categories, projects) =
            tokio::join!(self.backend.categories(), self.backend.published_projects());
        match categories {
            Ok(categories) => self.categories = categories,
            Err(e) => tracing::warn!("Failed to load categories: {}", e),
        }
        match projects {
            Ok(projects) => {
                self.projects = projects;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load projects: {}", e);
                Err(e)
            }
        }
    }

    pub async fn load_mine(&mut self) -> Result<(), ClientError> {
        match self.backend.my_projects().await {
            Ok(mine) => {
                self.mine = mine;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load own projects: {}", e);
                Err(e)
            }
        }
    }

    pub fn filtered(&self) -> Vec<&ProjectSummary> {
        self.projects
            .iter()
            .filter(|p| matches_search(p, &self.search) && self.category.admits(p))
            .collect()
    }

    pub async fn create_project(&mut self, form: ProjectForm) -> Result<ProjectSummary, FormError> {
        let request = form.into_request()?;
        let project = self
            .backend
            .create_project(&request)
            .await
            .map_err(|e| {
                tracing::warn!("Project creation failed: {}", e);
                FormError::rejected("Error creating project")(e)
            })?;
        tracing::info!("Created project {}", project.id);

        let _ = self.load().await;
        let _ = self.load_mine().await;
        Ok(project)
    }
}
