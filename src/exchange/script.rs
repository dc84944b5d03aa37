use std::fmt::Display;

use crate::mailbox::PrincipalId;

/// How to authenticate `Connect-ExchangeOnline`.
#[derive(Debug, Clone, Copy)]
pub enum Login<'a> {
    Interactive {
        user: &'a str,
    },
    Certificate {
        app_id: &'a str,
        thumbprint: &'a str,
    },
    Password {
        user: &'a str,
        password: &'a str,
    },
}

/// A single line of PowerShell plus a loggable description of it.
///
/// Only the summary is ever logged, the text may carry credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    text: String,
    summary: String,
}

impl Script {
    fn new(text: String, summary: impl Into<String>) -> Self {
        Self {
            text,
            summary: summary.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn connect(organization: &str, login: Login<'_>) -> Self {
        let mut text = String::from(
            "$ProgressPreference = 'SilentlyContinue'; \
             Import-Module ExchangeOnlineManagement; \
             Connect-ExchangeOnline -ShowBanner:$false",
        );
        match login {
            Login::Interactive { user } => {
                text.push_str(&format!(" -UserPrincipalName {}", quote(user)));
            }
            Login::Certificate { app_id, thumbprint } => {
                text.push_str(&format!(
                    " -AppId {} -CertificateThumbprint {} -Organization {}",
                    quote(app_id),
                    quote(thumbprint),
                    quote(organization)
                ));
            }
            Login::Password { user, password } => {
                text.push_str(&format!(
                    " -Credential (New-Object System.Management.Automation.PSCredential({}, (ConvertTo-SecureString {} -AsPlainText -Force)))",
                    quote(user),
                    quote(password)
                ));
            }
        }
        Self::new(text, format!("Connect-ExchangeOnline ({organization})"))
    }

    pub fn list_synced_mailboxes() -> Self {
        Self::new(
            "Get-Mailbox -ResultSize Unlimited -Filter 'IsDirSynced -eq $true' | Select-Object \
             @{n='DisplayName';e={[string]$_.DisplayName}}, \
             @{n='PrimarySmtpAddress';e={[string]$_.PrimarySmtpAddress}}, \
             @{n='Identity';e={[string]$_.Guid}}, \
             @{n='IsExchangeCloudManaged';e={[bool]$_.IsExchangeCloudManaged}}, \
             @{n='IsDirSynced';e={[bool]$_.IsDirSynced}}"
                .to_string(),
            "Get-Mailbox (directory synced)",
        )
    }

    pub fn set_cloud_managed(principal_id: &PrincipalId, value: bool) -> Self {
        Self::new(
            format!(
                "Set-Mailbox -Identity {} -IsExchangeCloudManaged:{}",
                quote(principal_id.as_str()),
                boolean(value)
            ),
            format!("Set-Mailbox {principal_id} -IsExchangeCloudManaged:{value}"),
        )
    }

    pub fn disconnect() -> Self {
        Self::new(
            "Disconnect-ExchangeOnline -Confirm:$false".to_string(),
            "Disconnect-ExchangeOnline",
        )
    }

    /// Wraps the script so the shell answers with exactly one JSON line
    /// followed by `marker` on its own line.
    pub fn framed(&self, marker: &str) -> String {
        format!(
            "try {{ $ErrorActionPreference = 'Stop'; $mailflipData = @(& {{ {} }}); \
             [pscustomobject]@{{ ok = $true; data = $mailflipData }} | ConvertTo-Json -Compress -Depth 4 }} \
             catch {{ [pscustomobject]@{{ ok = $false; error = $_.Exception.Message }} | ConvertTo-Json -Compress }}; \
             Write-Output {}",
            self.text(),
            quote(marker)
        )
    }
}

impl Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.summary.fmt(f)
    }
}

fn boolean(value: bool) -> &'static str {
    if value { "$true" } else { "$false" }
}

/// Single-quoted PowerShell literal. Line breaks cannot cross the line based
/// protocol and are dropped.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\r' | '\n' => {}
            // powershell also treats typographic single quotes as delimiters
            '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => {
                quoted.push(c);
                quoted.push(c);
            }
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
