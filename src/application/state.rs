//! Application state management for the terminal client.
//!
//! This module contains the screen/navigation state, the root navigation
//! gate, and the per-screen input buffers the terminal user interface works
//! with. Network and storage access is injected through [`Services`]; the
//! state itself never talks to the outside world.

use crate::application::session::{AlertSink, ApiError, AuthApi, Session, TokenStore};
use crate::domain::{Comment, Post, PostDetail, User};
use std::collections::VecDeque;

/// The two mutually exclusive navigation subtrees the root can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootFlow {
    /// Sign-in / sign-up screens, mounted while no session exists.
    Auth,
    /// The tabbed application shell, mounted while signed in.
    Main,
}

/// The root navigation gate.
///
/// A pure function of the signed flag and nothing else: every frame renders
/// exactly one of the two subtrees based on this.
///
/// # Examples
///
/// ```
/// use termgram::application::{root_flow, RootFlow};
///
/// assert_eq!(root_flow(false), RootFlow::Auth);
/// assert_eq!(root_flow(true), RootFlow::Main);
/// ```
pub fn root_flow(signed: bool) -> RootFlow {
    if signed {
        RootFlow::Main
    } else {
        RootFlow::Auth
    }
}

/// Screens of the authentication flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRoute {
    SignIn,
    SignUp,
}

/// Bottom tab bar entries of the main flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    CreatePost,
    Profile,
}

/// Screens of the main flow. `Tabs` shows whichever tab is selected; the
/// other variants are pushed on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainRoute {
    Tabs,
    Post { post_id: u64 },
    Comments { post_id: u64 },
    EditProfile,
    Settings,
}

/// Content endpoints of the backing service.
///
/// Every call carries the bearer token explicitly; implementations hold no
/// session state of their own.
pub trait ContentApi {
    fn feed(&self, token: &str) -> Result<Vec<Post>, ApiError>;
    fn post_detail(&self, token: &str, post_id: u64, viewer_id: u64)
        -> Result<PostDetail, ApiError>;
    fn create_like(&self, token: &str, user_id: u64, post_id: u64) -> Result<(), ApiError>;
    fn comments(&self, token: &str, post_id: u64) -> Result<Vec<Comment>, ApiError>;
    fn create_comment(
        &self,
        token: &str,
        user_id: u64,
        post_id: u64,
        content: &str,
    ) -> Result<Comment, ApiError>;
    fn update_profile(
        &self,
        token: &str,
        user_id: u64,
        name: &str,
        bio: &str,
    ) -> Result<User, ApiError>;
    fn create_post(
        &self,
        token: &str,
        description: &str,
        image_urls: &[String],
    ) -> Result<Post, ApiError>;
}

/// The external collaborators, bundled once in `main` and threaded through
/// the input layer.
pub struct Services {
    pub auth: Box<dyn AuthApi>,
    pub content: Box<dyn ContentApi>,
    pub tokens: Box<dyn TokenStore>,
}

/// A titled message waiting to be shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// FIFO queue of pending alerts; the UI shows the front one as a modal
/// popup until it is dismissed.
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<Alert>,
}

impl AlertQueue {
    pub fn current(&self) -> Option<&Alert> {
        self.pending.front()
    }

    pub fn dismiss(&mut self) {
        self.pending.pop_front();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl AlertSink for AlertQueue {
    fn alert(&mut self, title: &str, message: &str) {
        self.pending.push_back(Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

/// A single-line text input buffer with a cursor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextField {
    pub value: String,
    pub cursor: usize,
}

impl TextField {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor -= prev;
            self.value.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor -= prev;
        }
    }

    pub fn right(&mut self) {
        if self.cursor < self.value.len() {
            let next = self.value[self.cursor..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor += next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

/// The sign-in form: field 0 is email, field 1 is password.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignInForm {
    pub email: TextField,
    pub password: TextField,
    pub focus: usize,
}

impl SignInForm {
    pub const FIELDS: usize = 2;

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }
}

/// The sign-up form: username, email, password.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignUpForm {
    pub username: TextField,
    pub email: TextField,
    pub password: TextField,
    pub focus: usize,
}

impl SignUpForm {
    pub const FIELDS: usize = 3;

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.username,
            1 => &mut self.email,
            _ => &mut self.password,
        }
    }
}

/// The edit-profile form: display name and bio.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileForm {
    pub name: TextField,
    pub bio: TextField,
    pub focus: usize,
}

impl ProfileForm {
    pub const FIELDS: usize = 2;

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.name,
            _ => &mut self.bio,
        }
    }
}

/// The create-post form: caption plus a space-separated image URL list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposerForm {
    pub caption: TextField,
    pub image_urls: TextField,
    pub focus: usize,
}

impl ComposerForm {
    pub const FIELDS: usize = 2;

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.caption,
            _ => &mut self.image_urls,
        }
    }

    /// The entered URLs, split on whitespace, empty entries dropped.
    pub fn urls(&self) -> Vec<String> {
        self.image_urls
            .value
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// Main application state: the session plus everything the screens render.
///
/// # Examples
///
/// ```
/// use termgram::application::{App, RootFlow};
///
/// let app = App::default();
/// assert_eq!(app.flow(), RootFlow::Auth);
/// assert!(app.feed.is_empty());
/// ```
#[derive(Default)]
pub struct App {
    /// The authentication session; the root gate keys off `session.signed`
    pub session: Session,
    /// Alerts raised by session transitions, drained by the UI
    pub alerts: AlertQueue,
    /// Active screen within the auth flow
    pub auth_route: AuthRoute,
    /// Selected bottom tab within the main flow
    pub tab: Tab,
    /// Active screen within the main flow
    pub main_route: MainRoute,
    pub sign_in: SignInForm,
    pub sign_up: SignUpForm,
    /// Home feed cache, newest first as the API returns it
    pub feed: Vec<Post>,
    /// True while a feed request is in flight
    pub feed_loading: bool,
    /// Feed row the cursor is on
    pub selected_post: usize,
    /// Loaded detail for the post screen, absent while loading
    pub post_detail: Option<PostDetail>,
    /// Carousel position within the open post's images
    pub carousel_index: usize,
    pub comments: Vec<Comment>,
    pub comment_input: TextField,
    pub profile_form: ProfileForm,
    pub composer: ComposerForm,
    /// Temporary status line text
    pub status_message: Option<String>,
}

impl Default for AuthRoute {
    fn default() -> Self {
        AuthRoute::SignIn
    }
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Home
    }
}

impl Default for MainRoute {
    fn default() -> Self {
        MainRoute::Tabs
    }
}

impl App {
    /// Which subtree the root mounts this frame. Pure in `session.signed`.
    pub fn flow(&self) -> RootFlow {
        root_flow(self.session.signed)
    }

    /// True while the active screen captures printable characters, in which
    /// case plain letter shortcuts (including quit) are suspended.
    pub fn is_typing(&self) -> bool {
        match self.flow() {
            RootFlow::Auth => true,
            RootFlow::Main => matches!(
                self.main_route,
                MainRoute::Comments { .. } | MainRoute::EditProfile
            ) || (self.main_route == MainRoute::Tabs && self.tab == Tab::CreatePost),
        }
    }

    // --- auth flow navigation ---

    pub fn start_sign_up(&mut self) {
        self.auth_route = AuthRoute::SignUp;
        self.status_message = None;
    }

    pub fn back_to_sign_in(&mut self) {
        self.auth_route = AuthRoute::SignIn;
        self.status_message = None;
    }

    // --- main flow navigation ---

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.main_route = MainRoute::Tabs;
        self.status_message = None;
    }

    /// Pushes the detail screen for the feed post under the cursor.
    pub fn open_selected_post(&mut self) {
        if let Some(post) = self.feed.get(self.selected_post) {
            self.main_route = MainRoute::Post { post_id: post.id };
            self.post_detail = None;
            self.carousel_index = 0;
        }
    }

    pub fn open_comments(&mut self, post_id: u64) {
        self.main_route = MainRoute::Comments { post_id };
        self.comments.clear();
        self.comment_input.clear();
    }

    /// Opens the profile editor pre-filled from the signed-in user's record.
    pub fn start_edit_profile(&mut self) {
        let profile = self.session.user.as_ref().and_then(|u| u.profile.as_ref());
        self.profile_form = ProfileForm {
            name: TextField::with_value(
                profile.and_then(|p| p.name.as_deref()).unwrap_or(""),
            ),
            bio: TextField::with_value(profile.and_then(|p| p.bio.as_deref()).unwrap_or("")),
            focus: 0,
        };
        self.main_route = MainRoute::EditProfile;
    }

    pub fn open_settings(&mut self) {
        self.main_route = MainRoute::Settings;
    }

    /// Esc handling: pops the current screen back toward the tab bar.
    /// Comments return to their post; everything else returns to the tabs.
    pub fn pop_screen(&mut self) {
        self.main_route = match self.main_route {
            MainRoute::Comments { post_id } => MainRoute::Post { post_id },
            _ => MainRoute::Tabs,
        };
    }

    // --- feed ---

    pub fn select_next_post(&mut self) {
        if self.selected_post + 1 < self.feed.len() {
            self.selected_post += 1;
        }
    }

    pub fn select_previous_post(&mut self) {
        if self.selected_post > 0 {
            self.selected_post -= 1;
        }
    }

    /// Processes the result of a feed fetch.
    pub fn set_feed_result(&mut self, result: Result<Vec<Post>, ApiError>) {
        self.feed_loading = false;
        match result {
            Ok(posts) => {
                if self.selected_post >= posts.len() {
                    self.selected_post = posts.len().saturating_sub(1);
                }
                self.feed = posts;
            }
            Err(err) => {
                self.status_message = Some(format!("Feed load failed: {}", err));
            }
        }
    }

    // --- post detail / carousel ---

    pub fn set_post_detail_result(&mut self, result: Result<PostDetail, ApiError>) {
        match result {
            Ok(detail) => {
                if self.carousel_index >= detail.post.images.len() {
                    self.carousel_index = 0;
                }
                self.post_detail = Some(detail);
            }
            Err(err) => {
                self.status_message = Some(format!("Post load failed: {}", err));
                self.pop_screen();
            }
        }
    }

    /// Advances the image carousel, wrapping past the last image.
    pub fn carousel_next(&mut self) {
        let count = self.carousel_len();
        if count > 0 {
            self.carousel_index = (self.carousel_index + 1) % count;
        }
    }

    /// Steps the image carousel back, wrapping before the first image.
    pub fn carousel_previous(&mut self) {
        let count = self.carousel_len();
        if count > 0 {
            self.carousel_index = (self.carousel_index + count - 1) % count;
        }
    }

    fn carousel_len(&self) -> usize {
        self.post_detail
            .as_ref()
            .map(|d| d.post.images.len())
            .unwrap_or(0)
    }

    // --- comments ---

    pub fn set_comments_result(&mut self, result: Result<Vec<Comment>, ApiError>) {
        match result {
            Ok(comments) => self.comments = comments,
            Err(err) => {
                self.status_message = Some(format!("Comments load failed: {}", err));
            }
        }
    }

    pub fn set_comment_posted_result(&mut self, result: Result<Comment, ApiError>) {
        match result {
            Ok(comment) => {
                self.comments.push(comment);
                self.comment_input.clear();
            }
            Err(err) => {
                self.status_message = Some(format!("Comment failed: {}", err));
            }
        }
    }

    // --- profile ---

    /// Processes the result of a profile update: refreshes the cached user
    /// record and returns to the profile tab on success.
    pub fn set_profile_result(&mut self, result: Result<User, ApiError>) {
        match result {
            Ok(user) => {
                self.session.user = Some(user);
                self.status_message = Some("Profile updated".to_string());
                self.main_route = MainRoute::Tabs;
                self.tab = Tab::Profile;
            }
            Err(err) => {
                self.status_message = Some(format!("Profile update failed: {}", err));
            }
        }
    }

    // --- create post ---

    /// Processes the result of publishing a post: clears the composer and
    /// jumps to Home so the refreshed feed shows the new post on top.
    pub fn set_create_post_result(&mut self, result: Result<Post, ApiError>) {
        match result {
            Ok(_) => {
                self.composer = ComposerForm::default();
                self.select_tab(Tab::Home);
                self.status_message = Some("Posted".to_string());
            }
            Err(err) => {
                self.status_message = Some(format!("Post failed: {}", err));
            }
        }
    }

    // --- sign out ---

    /// Clears everything a signed-in user accumulated so the next session
    /// starts from a pristine shell.
    pub fn reset_after_sign_out(&mut self) {
        self.auth_route = AuthRoute::SignIn;
        self.tab = Tab::Home;
        self.main_route = MainRoute::Tabs;
        self.sign_in = SignInForm::default();
        self.sign_up = SignUpForm::default();
        self.feed.clear();
        self.feed_loading = false;
        self.selected_post = 0;
        self.post_detail = None;
        self.carousel_index = 0;
        self.comments.clear();
        self.comment_input.clear();
        self.profile_form = ProfileForm::default();
        self.composer = ComposerForm::default();
        self.status_message = None;
    }
}
