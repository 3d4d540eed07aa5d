use serde::Deserialize;

use crate::application::admin::PopupInput;
use crate::application::auth::NewSubAdmin;
use crate::application::repos::SaveProfileParams;
use crate::application::profile::split_lines;

use super::shared::{blank_to_none_opt, parse_checkbox_flag};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ArticleForm {
    pub(crate) title: String,
    pub(crate) category: String,
    pub(crate) subcategory: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) content: String,
}

impl ArticleForm {
    pub(crate) fn subcategory(&self) -> Option<String> {
        blank_to_none_opt(self.subcategory.clone())
    }

    pub(crate) fn description(&self) -> Option<String> {
        blank_to_none_opt(self.description.clone())
    }

    pub(crate) fn image_url(&self) -> Option<String> {
        blank_to_none_opt(self.image_url.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PopupForm {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image_url: String,
    pub(crate) link_url: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) is_active: Option<String>,
    pub(crate) position: String,
    pub(crate) size_percentage: String,
    pub(crate) display_order: String,
}

impl From<PopupForm> for PopupInput {
    fn from(form: PopupForm) -> Self {
        PopupInput {
            is_active: parse_checkbox_flag(&form.is_active),
            title: form.title,
            content: form.content,
            image_url: form.image_url,
            link_url: form.link_url,
            start_date: form.start_date,
            end_date: form.end_date,
            position: form.position,
            size_percentage: form.size_percentage,
            display_order: form.display_order,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SubAdminForm {
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) password: String,
}

impl From<SubAdminForm> for NewSubAdmin {
    fn from(form: SubAdminForm) -> Self {
        NewSubAdmin {
            email: form.email,
            name: form.name,
            password: form.password,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProfileForm {
    pub(crate) name: String,
    pub(crate) title: String,
    pub(crate) introduction: String,
    pub(crate) career: String,
    pub(crate) industry_expertise: String,
    pub(crate) area_of_expertise: String,
    pub(crate) profile_image_url: String,
}

impl ProfileForm {
    pub(crate) fn to_params(&self) -> SaveProfileParams {
        SaveProfileParams {
            name: self.name.clone(),
            title: self.title.clone(),
            introduction: self.introduction.clone(),
            career: split_lines(&self.career),
            industry_expertise: split_lines(&self.industry_expertise),
            area_of_expertise: split_lines(&self.area_of_expertise),
            profile_image_url: blank_to_none_opt(Some(self.profile_image_url.clone())),
        }
    }
}
