use crate::application::{
    App, AuthRoute, ComposerForm, MainRoute, ProfileForm, RootFlow, Services, SignInForm,
    SignUpForm, Tab, TextField,
};
use crate::domain::{validate_credentials, validate_registration};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(
        app: &mut App,
        services: &Services,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) {
        // A pending alert is modal: it swallows every key until dismissed.
        if !app.alerts.is_empty() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                app.alerts.dismiss();
            }
            return;
        }

        match app.flow() {
            RootFlow::Auth => match app.auth_route {
                AuthRoute::SignIn => Self::handle_sign_in(app, services, key, modifiers),
                AuthRoute::SignUp => Self::handle_sign_up(app, services, key, modifiers),
            },
            RootFlow::Main => match app.main_route {
                MainRoute::Tabs => match app.tab {
                    Tab::Home => Self::handle_home(app, services, key),
                    Tab::CreatePost => Self::handle_composer(app, services, key),
                    Tab::Profile => Self::handle_profile(app, key),
                },
                MainRoute::Post { post_id } => Self::handle_post(app, services, key, post_id),
                MainRoute::Comments { post_id } => {
                    Self::handle_comments(app, services, key, post_id)
                }
                MainRoute::EditProfile => Self::handle_edit_profile(app, services, key),
                MainRoute::Settings => Self::handle_settings(app, services, key),
            },
        }
    }

    fn handle_sign_in(app: &mut App, services: &Services, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('n') = key {
                app.start_sign_up();
            }
            return;
        }

        match key {
            KeyCode::Enter => {
                let email = app.sign_in.email.value.clone();
                let password = app.sign_in.password.value.clone();
                if let Err(err) = validate_credentials(&email, &password) {
                    app.status_message = Some(err.to_string());
                    return;
                }
                let App {
                    session, alerts, ..
                } = app;
                let signed = session.sign_in_request(
                    services.auth.as_ref(),
                    services.tokens.as_ref(),
                    alerts,
                    &email,
                    &password,
                );
                if signed {
                    Self::enter_main(app, services);
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                app.sign_in.focus = (app.sign_in.focus + 1) % SignInForm::FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.sign_in.focus =
                    (app.sign_in.focus + SignInForm::FIELDS - 1)
                        % SignInForm::FIELDS;
            }
            _ => Self::edit_field(app.sign_in.focused_mut(), key),
        }
    }

    fn handle_sign_up(app: &mut App, services: &Services, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        match key {
            KeyCode::Esc => {
                app.back_to_sign_in();
            }
            KeyCode::Enter => {
                let username = app.sign_up.username.value.clone();
                let email = app.sign_up.email.value.clone();
                let password = app.sign_up.password.value.clone();
                if let Err(err) = validate_registration(&username, &email, &password) {
                    app.status_message = Some(err.to_string());
                    return;
                }
                let App {
                    session, alerts, ..
                } = app;
                let signed = session.sign_up_request(
                    services.auth.as_ref(),
                    services.tokens.as_ref(),
                    alerts,
                    &username,
                    &email,
                    &password,
                );
                if signed {
                    Self::enter_main(app, services);
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                app.sign_up.focus = (app.sign_up.focus + 1) % SignUpForm::FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.sign_up.focus =
                    (app.sign_up.focus + SignUpForm::FIELDS - 1)
                        % SignUpForm::FIELDS;
            }
            _ => Self::edit_field(app.sign_up.focused_mut(), key),
        }
    }

    fn handle_home(app: &mut App, services: &Services, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_post(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_post(),
            KeyCode::Enter => {
                app.open_selected_post();
                if let MainRoute::Post { post_id } = app.main_route {
                    Self::load_post(app, services, post_id);
                }
            }
            KeyCode::Char('r') => Self::refresh_feed(app, services),
            _ => Self::handle_tab_keys(app, key),
        }
    }

    fn handle_post(app: &mut App, services: &Services, key: KeyCode, post_id: u64) {
        match key {
            KeyCode::Esc => app.pop_screen(),
            KeyCode::Left | KeyCode::Char('h') => app.carousel_previous(),
            KeyCode::Right | KeyCode::Char('l') => app.carousel_next(),
            KeyCode::Char('f') => {
                let (Some(token), Some(user_id)) = (
                    app.session.token.clone(),
                    app.session.user.as_ref().map(|u| u.id),
                ) else {
                    return;
                };
                match services.content.create_like(&token, user_id, post_id) {
                    // Reload so the like count reflects the new state.
                    Ok(()) => Self::load_post(app, services, post_id),
                    Err(err) => {
                        app.status_message = Some(format!("Like failed: {}", err));
                    }
                }
            }
            KeyCode::Char('c') => {
                app.open_comments(post_id);
                Self::load_comments(app, services, post_id);
            }
            _ => {}
        }
    }

    fn handle_comments(app: &mut App, services: &Services, key: KeyCode, post_id: u64) {
        match key {
            KeyCode::Esc => app.pop_screen(),
            KeyCode::Enter => {
                let content = app.comment_input.value.trim().to_string();
                if content.is_empty() {
                    return;
                }
                let (Some(token), Some(user_id)) = (
                    app.session.token.clone(),
                    app.session.user.as_ref().map(|u| u.id),
                ) else {
                    return;
                };
                let result = services
                    .content
                    .create_comment(&token, user_id, post_id, &content);
                app.set_comment_posted_result(result);
            }
            _ => Self::edit_field(&mut app.comment_input, key),
        }
    }

    fn handle_composer(app: &mut App, services: &Services, key: KeyCode) {
        match key {
            KeyCode::Esc => app.select_tab(Tab::Home),
            KeyCode::Tab | KeyCode::Down => {
                app.composer.focus =
                    (app.composer.focus + 1) % ComposerForm::FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.composer.focus =
                    (app.composer.focus + ComposerForm::FIELDS - 1)
                        % ComposerForm::FIELDS;
            }
            KeyCode::Enter => {
                let urls = app.composer.urls();
                if urls.is_empty() {
                    app.status_message = Some("Add at least one image URL".to_string());
                    return;
                }
                let Some(token) = app.session.token.clone() else {
                    return;
                };
                let caption = app.composer.caption.value.clone();
                let result = services.content.create_post(&token, &caption, &urls);
                let posted = result.is_ok();
                app.set_create_post_result(result);
                if posted {
                    Self::refresh_feed(app, services);
                }
            }
            _ => Self::edit_field(app.composer.focused_mut(), key),
        }
    }

    fn handle_profile(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('e') => app.start_edit_profile(),
            KeyCode::Char('s') => app.open_settings(),
            _ => Self::handle_tab_keys(app, key),
        }
    }

    fn handle_edit_profile(app: &mut App, services: &Services, key: KeyCode) {
        match key {
            KeyCode::Esc => app.pop_screen(),
            KeyCode::Tab | KeyCode::Down => {
                app.profile_form.focus =
                    (app.profile_form.focus + 1) % ProfileForm::FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.profile_form.focus =
                    (app.profile_form.focus + ProfileForm::FIELDS - 1)
                        % ProfileForm::FIELDS;
            }
            KeyCode::Enter => {
                let (Some(token), Some(user_id)) = (
                    app.session.token.clone(),
                    app.session.user.as_ref().map(|u| u.id),
                ) else {
                    return;
                };
                let name = app.profile_form.name.value.clone();
                let bio = app.profile_form.bio.value.clone();
                let result = services.content.update_profile(&token, user_id, &name, &bio);
                app.set_profile_result(result);
            }
            _ => Self::edit_field(app.profile_form.focused_mut(), key),
        }
    }

    fn handle_settings(app: &mut App, services: &Services, key: KeyCode) {
        match key {
            KeyCode::Esc => app.pop_screen(),
            KeyCode::Enter => {
                let App { session, .. } = app;
                session.sign_out(services.tokens.as_ref());
                app.reset_after_sign_out();
            }
            _ => {}
        }
    }

    /// Number-key tab switching shared by the non-typing tab screens.
    fn handle_tab_keys(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('1') => app.select_tab(Tab::Home),
            KeyCode::Char('2') => app.select_tab(Tab::CreatePost),
            KeyCode::Char('3') => app.select_tab(Tab::Profile),
            _ => {}
        }
    }

    fn edit_field(field: &mut TextField, key: KeyCode) {
        match key {
            KeyCode::Char(c) => field.insert(c),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Left => field.left(),
            KeyCode::Right => field.right(),
            KeyCode::Home => field.home(),
            KeyCode::End => field.end(),
            _ => {}
        }
    }

    /// First frame of the signed-in shell: land on Home with a fresh feed.
    fn enter_main(app: &mut App, services: &Services) {
        app.select_tab(Tab::Home);
        Self::refresh_feed(app, services);
    }

    fn refresh_feed(app: &mut App, services: &Services) {
        let Some(token) = app.session.token.clone() else {
            return;
        };
        app.feed_loading = true;
        let result = services.content.feed(&token);
        app.set_feed_result(result);
    }

    fn load_post(app: &mut App, services: &Services, post_id: u64) {
        let (Some(token), Some(viewer_id)) = (
            app.session.token.clone(),
            app.session.user.as_ref().map(|u| u.id),
        ) else {
            return;
        };
        let result = services.content.post_detail(&token, post_id, viewer_id);
        app.set_post_detail_result(result);
    }

    fn load_comments(app: &mut App, services: &Services, post_id: u64) {
        let Some(token) = app.session.token.clone() else {
            return;
        };
        let result = services.content.comments(&token, post_id);
        app.set_comments_result(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApiError, AuthApi, ContentApi, TokenStore};
    use crate::domain::{Comment, Post, PostDetail, SignInResponse, User};
    use serde_json::json;

    struct StubAuth {
        accept: bool,
    }

    impl AuthApi for StubAuth {
        fn sign_in(&self, _email: &str, _password: &str) -> Result<SignInResponse, ApiError> {
            if self.accept {
                Ok(SignInResponse {
                    jwt: "t1".to_string(),
                    user: User {
                        id: 1,
                        username: "jdoe".to_string(),
                        email: "a@b.com".to_string(),
                        profile: None,
                    },
                })
            } else {
                Err(ApiError::rejection(
                    400,
                    json!({"data": [{"messages": [{"message": "Invalid credentials"}]}]}),
                ))
            }
        }

        fn register(&self, _u: &str, _e: &str, _p: &str) -> Result<(), ApiError> {
            if self.accept {
                Ok(())
            } else {
                Err(ApiError::transport("unreachable"))
            }
        }
    }

    struct StubContent;

    impl ContentApi for StubContent {
        fn feed(&self, _token: &str) -> Result<Vec<Post>, ApiError> {
            Ok(vec![
                Post {
                    id: 10,
                    description: Some("first".to_string()),
                    images: vec![
                        crate::domain::ImageRef { url: "a".to_string() },
                        crate::domain::ImageRef { url: "b".to_string() },
                    ],
                    user: None,
                },
                Post {
                    id: 11,
                    description: None,
                    images: Vec::new(),
                    user: None,
                },
            ])
        }

        fn post_detail(
            &self,
            _token: &str,
            post_id: u64,
            _viewer_id: u64,
        ) -> Result<PostDetail, ApiError> {
            Ok(PostDetail {
                post: Post {
                    id: post_id,
                    description: Some("first".to_string()),
                    images: vec![
                        crate::domain::ImageRef { url: "a".to_string() },
                        crate::domain::ImageRef { url: "b".to_string() },
                    ],
                    user: None,
                },
                likes: 3,
                liked_by_viewer: false,
            })
        }

        fn create_like(&self, _token: &str, _user_id: u64, _post_id: u64) -> Result<(), ApiError> {
            Ok(())
        }

        fn comments(&self, _token: &str, _post_id: u64) -> Result<Vec<Comment>, ApiError> {
            Ok(vec![Comment {
                id: 1,
                content: "hello".to_string(),
                user: None,
            }])
        }

        fn create_comment(
            &self,
            _token: &str,
            _user_id: u64,
            _post_id: u64,
            content: &str,
        ) -> Result<Comment, ApiError> {
            Ok(Comment {
                id: 2,
                content: content.to_string(),
                user: None,
            })
        }

        fn update_profile(
            &self,
            _token: &str,
            user_id: u64,
            name: &str,
            bio: &str,
        ) -> Result<User, ApiError> {
            Ok(User {
                id: user_id,
                username: "jdoe".to_string(),
                email: "a@b.com".to_string(),
                profile: Some(crate::domain::Profile {
                    id: 7,
                    name: Some(name.to_string()),
                    bio: Some(bio.to_string()),
                    avatar: None,
                }),
            })
        }

        fn create_post(
            &self,
            _token: &str,
            description: &str,
            image_urls: &[String],
        ) -> Result<Post, ApiError> {
            Ok(Post {
                id: 99,
                description: Some(description.to_string()),
                images: image_urls
                    .iter()
                    .map(|url| crate::domain::ImageRef { url: url.clone() })
                    .collect(),
                user: None,
            })
        }
    }

    struct NullTokenStore;

    impl TokenStore for NullTokenStore {
        fn set(&self, _key: &str, _value: &str) -> Result<(), String> {
            Ok(())
        }

        fn remove(&self, _key: &str) -> Result<(), String> {
            Ok(())
        }
    }

    fn services(accept_auth: bool) -> Services {
        Services {
            auth: Box::new(StubAuth { accept: accept_auth }),
            content: Box::new(StubContent),
            tokens: Box::new(NullTokenStore),
        }
    }

    fn press(app: &mut App, services: &Services, key: KeyCode) {
        InputHandler::handle_key_event(app, services, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, services: &Services, text: &str) {
        for c in text.chars() {
            press(app, services, KeyCode::Char(c));
        }
    }

    fn sign_in(app: &mut App, services: &Services) {
        type_text(app, services, "a@b.com");
        press(app, services, KeyCode::Tab);
        type_text(app, services, "x");
        press(app, services, KeyCode::Enter);
    }

    #[test]
    fn test_sign_in_flow_lands_on_home_with_feed() {
        let services = services(true);
        let mut app = App::default();

        sign_in(&mut app, &services);

        assert_eq!(app.flow(), RootFlow::Main);
        assert_eq!(app.tab, Tab::Home);
        assert_eq!(app.feed.len(), 2);
        assert!(app.alerts.is_empty());
    }

    #[test]
    fn test_failed_sign_in_raises_modal_alert() {
        let services = services(false);
        let mut app = App::default();

        sign_in(&mut app, &services);

        assert_eq!(app.flow(), RootFlow::Auth);
        assert_eq!(app.alerts.current().unwrap().message, "Invalid credentials");

        // The alert is modal: typing is swallowed until it is dismissed.
        press(&mut app, &services, KeyCode::Char('z'));
        assert!(!app.sign_in.email.value.contains('z'));
        press(&mut app, &services, KeyCode::Enter);
        assert!(app.alerts.is_empty());
    }

    #[test]
    fn test_sign_in_validation_short_circuits() {
        let services = services(true);
        let mut app = App::default();

        // No '@' in the email; nothing must be submitted.
        type_text(&mut app, &services, "nobody");
        press(&mut app, &services, KeyCode::Enter);

        assert_eq!(app.flow(), RootFlow::Auth);
        assert!(app.status_message.as_deref().unwrap().contains("Invalid email"));
    }

    #[test]
    fn test_sign_in_focus_cycles() {
        let services = services(true);
        let mut app = App::default();

        assert_eq!(app.sign_in.focus, 0);
        press(&mut app, &services, KeyCode::Tab);
        assert_eq!(app.sign_in.focus, 1);
        press(&mut app, &services, KeyCode::Tab);
        assert_eq!(app.sign_in.focus, 0);
        press(&mut app, &services, KeyCode::BackTab);
        assert_eq!(app.sign_in.focus, 1);
    }

    #[test]
    fn test_ctrl_n_opens_sign_up_and_esc_returns() {
        let services = services(true);
        let mut app = App::default();

        InputHandler::handle_key_event(
            &mut app,
            &services,
            KeyCode::Char('n'),
            KeyModifiers::CONTROL,
        );
        assert_eq!(app.auth_route, AuthRoute::SignUp);

        press(&mut app, &services, KeyCode::Esc);
        assert_eq!(app.auth_route, AuthRoute::SignIn);
    }

    #[test]
    fn test_sign_up_flow_reaches_main() {
        let services = services(true);
        let mut app = App::default();
        app.start_sign_up();

        type_text(&mut app, &services, "jdoe");
        press(&mut app, &services, KeyCode::Tab);
        type_text(&mut app, &services, "a@b.com");
        press(&mut app, &services, KeyCode::Tab);
        type_text(&mut app, &services, "x");
        press(&mut app, &services, KeyCode::Enter);

        assert_eq!(app.flow(), RootFlow::Main);
        assert_eq!(app.feed.len(), 2);
    }

    #[test]
    fn test_home_navigation_and_post_open() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);

        press(&mut app, &services, KeyCode::Char('j'));
        assert_eq!(app.selected_post, 1);
        press(&mut app, &services, KeyCode::Char('k'));
        assert_eq!(app.selected_post, 0);

        press(&mut app, &services, KeyCode::Enter);
        assert_eq!(app.main_route, MainRoute::Post { post_id: 10 });
        let detail = app.post_detail.as_ref().unwrap();
        assert_eq!(detail.likes, 3);
    }

    #[test]
    fn test_post_carousel_keys_wrap() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);
        press(&mut app, &services, KeyCode::Enter);

        press(&mut app, &services, KeyCode::Right);
        assert_eq!(app.carousel_index, 1);
        press(&mut app, &services, KeyCode::Right);
        assert_eq!(app.carousel_index, 0);
        press(&mut app, &services, KeyCode::Left);
        assert_eq!(app.carousel_index, 1);
    }

    #[test]
    fn test_comment_flow() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);
        press(&mut app, &services, KeyCode::Enter);

        press(&mut app, &services, KeyCode::Char('c'));
        assert_eq!(app.main_route, MainRoute::Comments { post_id: 10 });
        assert_eq!(app.comments.len(), 1);

        type_text(&mut app, &services, "nice shot");
        press(&mut app, &services, KeyCode::Enter);
        assert_eq!(app.comments.len(), 2);
        assert_eq!(app.comments[1].content, "nice shot");
        assert_eq!(app.comment_input.value, "");

        // Blank comments are not submitted.
        press(&mut app, &services, KeyCode::Enter);
        assert_eq!(app.comments.len(), 2);
    }

    #[test]
    fn test_tab_switching_keys() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);

        press(&mut app, &services, KeyCode::Char('3'));
        assert_eq!(app.tab, Tab::Profile);
        press(&mut app, &services, KeyCode::Char('2'));
        assert_eq!(app.tab, Tab::CreatePost);
    }

    #[test]
    fn test_edit_profile_flow() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);
        press(&mut app, &services, KeyCode::Char('3'));

        press(&mut app, &services, KeyCode::Char('e'));
        assert_eq!(app.main_route, MainRoute::EditProfile);

        type_text(&mut app, &services, "Johnny");
        press(&mut app, &services, KeyCode::Tab);
        type_text(&mut app, &services, "shoots film");
        press(&mut app, &services, KeyCode::Enter);

        assert_eq!(app.main_route, MainRoute::Tabs);
        let profile = app.session.user.as_ref().unwrap().profile.as_ref().unwrap();
        assert_eq!(profile.name.as_deref(), Some("Johnny"));
        assert_eq!(profile.bio.as_deref(), Some("shoots film"));
    }

    #[test]
    fn test_create_post_requires_image_url() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);
        press(&mut app, &services, KeyCode::Char('2'));

        type_text(&mut app, &services, "sunset");
        press(&mut app, &services, KeyCode::Enter);

        assert_eq!(app.tab, Tab::CreatePost);
        assert!(app.status_message.as_deref().unwrap().contains("image URL"));
    }

    #[test]
    fn test_create_post_success_returns_to_home() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);
        press(&mut app, &services, KeyCode::Char('2'));

        type_text(&mut app, &services, "sunset");
        press(&mut app, &services, KeyCode::Tab);
        type_text(&mut app, &services, "http://a.jpg");
        press(&mut app, &services, KeyCode::Enter);

        assert_eq!(app.tab, Tab::Home);
        assert!(!app.feed.is_empty());
    }

    #[test]
    fn test_settings_sign_out_returns_to_auth_flow() {
        let services = services(true);
        let mut app = App::default();
        sign_in(&mut app, &services);
        press(&mut app, &services, KeyCode::Char('3'));
        press(&mut app, &services, KeyCode::Char('s'));
        assert_eq!(app.main_route, MainRoute::Settings);

        press(&mut app, &services, KeyCode::Enter);

        assert_eq!(app.flow(), RootFlow::Auth);
        assert_eq!(app.session, crate::application::Session::default());
        assert!(app.feed.is_empty());
    }
}
