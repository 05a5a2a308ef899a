use std::sync::Arc;

use shared::{
    domain::HeroContent,
    upload::{UploadKind, UploadLimits},
};
use tracing::info;

use crate::backend::{ClientResult, PendingUpload, SiteBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroField {
    BackgroundImage,
    Title,
    Subtitle,
    Description,
    CtaText,
}

pub struct HeroEditor {
    backend: Arc<dyn SiteBackend>,
    limits: UploadLimits,
    hero: HeroContent,
    pending_image: Option<PendingUpload>,
}

impl HeroEditor {
    pub fn new(backend: Arc<dyn SiteBackend>) -> Self {
        Self::with_limits(backend, UploadLimits::default())
    }

    pub fn with_limits(backend: Arc<dyn SiteBackend>, limits: UploadLimits) -> Self {
        Self {
            backend,
            limits,
            hero: HeroContent::default(),
            pending_image: None,
        }
    }

    pub fn hero(&self) -> &HeroContent {
        &self.hero
    }

    pub fn pending_image(&self) -> Option<&PendingUpload> {
        self.pending_image.as_ref()
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.hero = self.backend.get_hero().await?;
        self.pending_image = None;
        Ok(())
    }

    pub fn set_field(&mut self, field: HeroField, value: impl Into<String>) {
        let value = value.into();
        match field {
            HeroField::BackgroundImage => self.hero.background_image = value,
            HeroField::Title => self.hero.title = value,
            HeroField::Subtitle => self.hero.subtitle = value,
            HeroField::Description => self.hero.description = value,
            HeroField::CtaText => self.hero.cta_text = value,
        }
    }

    pub fn select_image(&mut self, file: PendingUpload) -> ClientResult<()> {
        file.check(UploadKind::HeroImage, &self.limits)?;
        self.pending_image = Some(file);
        Ok(())
    }

    /// Uploads the pending image, if any, into `background_image` and saves.
    pub async fn save(&mut self) -> ClientResult<()> {
        if let Some(file) = &self.pending_image {
            file.check(UploadKind::HeroImage, &self.limits)?;
            self.hero.background_image = self.backend.upload_hero_image(file).await?;
            self.pending_image = None;
        }
        self.hero = self.backend.save_hero(&self.hero).await?;
        info!("hero editor: content saved");
        Ok(())
    }
}
